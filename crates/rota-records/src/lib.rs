//! `rota-records`: the record collection and its backups.
//!
//! [`RecordRepository`] owns the in-memory list of service records and
//! writes it through to a [`rota_store::RecordStore`] after every change.
//! Drafts are validated with [`rota_rules::validate`] before they become
//! records.

pub mod backup;
pub mod error;
pub mod repository;

pub use backup::{backup_file_name, export_json, parse_backup, read_backup, write_backup};
pub use error::{RecordError, Result};
pub use repository::RecordRepository;
