use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rota_core::Record;
use rota_store::RecordStore;
use tracing::{info, instrument, warn};

use crate::error::{RecordError, Result};
use crate::repository::RecordRepository;

const BACKUP_PREFIX: &str = "rota_backup_";

/// File name a backup taken on `date` is written under.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{BACKUP_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

/// Full collection as indented JSON, in collection order.
pub fn export_json(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(RecordError::Export)
}

/// Write a backup of `records` into `dir`. Returns the file written.
#[instrument(skip(records), fields(count = records.len()))]
pub fn write_backup(dir: &Path, records: &[Record], date: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(backup_file_name(date));
    let json = export_json(records)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "backup written");
    Ok(path)
}

/// Parse backup text into records. Any failure leaves the caller's data alone.
pub fn parse_backup(text: &str) -> Result<Vec<Record>> {
    serde_json::from_str(text).map_err(|e| {
        warn!("backup rejected: {e}");
        RecordError::ImportParse(e)
    })
}

/// Read and parse a backup file without blocking the runtime.
pub async fn read_backup(path: &Path) -> Result<Vec<Record>> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_backup(&text)
}

impl<S: RecordStore> RecordRepository<S> {
    /// Replace the whole collection with the backup in `text`.
    ///
    /// The collection is untouched when the text does not parse.
    pub fn restore_from_str(&mut self, text: &str) -> Result<usize> {
        let records = parse_backup(text)?;
        let count = records.len();
        self.replace_all(records)?;
        Ok(count)
    }

    /// Replace the whole collection with the backup file at `path`.
    #[instrument(skip(self))]
    pub async fn import_file(&mut self, path: &Path) -> Result<usize> {
        let records = read_backup(path).await?;
        let count = records.len();
        self.replace_all(records)?;
        info!(count, "backup imported");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(backup_file_name(date), "rota_backup_2026-03-07.json");
    }

    #[test]
    fn empty_collection_exports_as_empty_array() {
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn parse_rejects_non_lists() {
        assert!(matches!(parse_backup("{}"), Err(RecordError::ImportParse(_))));
        assert!(matches!(parse_backup("not json"), Err(RecordError::ImportParse(_))));
        assert!(parse_backup("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_backup(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(RecordError::Io(_))));
    }
}
