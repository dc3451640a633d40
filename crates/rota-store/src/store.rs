use std::cell::RefCell;
use std::path::Path;

use chrono::Utc;
use rota_core::Record;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::init_db;
use crate::error::Result;

/// Durable home of the whole record collection.
///
/// Load and save always move the complete list; there is no per-record
/// access at this layer.
pub trait RecordStore {
    /// Stored records, or an empty list when nothing (readable) is stored.
    fn load(&self) -> Vec<Record>;

    /// Replace the stored collection with `records`.
    fn save(&self, records: &[Record]) -> Result<()>;
}

fn decode(key: &str, raw: &str) -> Vec<Record> {
    match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(%key, "stored collection is corrupt, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Record store backed by a single SQLite file.
pub struct SqliteStore {
    conn: Connection,
    key: String,
}

impl SqliteStore {
    /// Wrap an open connection, initialising the schema if needed.
    pub fn new(conn: Connection, key: impl Into<String>) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        info!(path = %path.display(), "opening SQLite store");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::new(conn, key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw JSON currently stored under the key.
    pub fn raw(&self) -> Result<Option<String>> {
        match self.conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            [&self.key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl RecordStore for SqliteStore {
    fn load(&self) -> Vec<Record> {
        match self.raw() {
            Ok(Some(raw)) => {
                let records = decode(&self.key, &raw);
                debug!(key = %self.key, count = records.len(), "collection loaded");
                records
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, "failed to read stored collection: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![self.key, json, now],
        )?;
        debug!(key = %self.key, count = records.len(), "collection saved");
        Ok(())
    }
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: RefCell<Option<String>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an arbitrary payload (possibly corrupt).
    pub fn with_payload(raw: impl Into<String>) -> Self {
        Self {
            payload: RefCell::new(Some(raw.into())),
            saves: RefCell::new(0),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.payload.borrow().clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Vec<Record> {
        match self.payload.borrow().as_deref() {
            Some(raw) => decode("memory", raw),
            None => Vec::new(),
        }
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        *self.payload.borrow_mut() = Some(json);
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
