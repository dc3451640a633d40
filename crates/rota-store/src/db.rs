use rusqlite::Connection;

use crate::error::Result;

/// Initialise the key-value schema in `conn`.
///
/// One row per key; the record collection is a single JSON document, so
/// every save rewrites one row.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key         TEXT    NOT NULL PRIMARY KEY,
            value       TEXT    NOT NULL,   -- JSON document
            updated_at  TEXT    NOT NULL    -- RFC 3339
        ) STRICT;
        ",
    )?;
    Ok(())
}
