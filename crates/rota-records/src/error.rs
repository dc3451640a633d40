use rota_rules::RuleError;
use rota_store::StoreError;
use thiserror::Error;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required field was missing when saving.
    #[error("Validation failed: {0}")]
    Validation(#[from] RuleError),

    /// No record with the given ID exists.
    #[error("Record not found: {id}")]
    NotFound { id: String },

    /// A backup file could not be parsed. The collection was left as it was.
    #[error("Backup is not a valid record list: {0}")]
    ImportParse(#[source] serde_json::Error),

    /// The collection could not be encoded for export.
    #[error("Export failed: {0}")]
    Export(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisting the collection failed; the in-memory change is kept.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RecordError>;
