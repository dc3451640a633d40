//! `rota-store`: durable storage of the record collection.
//!
//! The collection is persisted as one JSON array under a namespaced key
//! (default `rota.records.v1`). [`SqliteStore`] keeps it in a small SQLite
//! key-value table; [`MemoryStore`] keeps it in process.

pub mod db;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{MemoryStore, RecordStore, SqliteStore};
