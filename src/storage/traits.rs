//! Storage traits and error types
//!
//! This module defines the trait interface for record sinks and the
//! associated error types.

use crate::storage::TradeRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store {path} has an unexpected header: {found:?}")]
    SchemaMismatch { path: String, found: Vec<String> },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only destination for extracted records
///
/// Implementations must make each appended record durable before returning;
/// nothing is ever rewritten or removed.
pub trait RecordSink {
    /// Appends one record to the end of the store
    fn append(&mut self, record: &TradeRecord) -> StorageResult<()>;
}

impl RecordSink for Vec<TradeRecord> {
    fn append(&mut self, record: &TradeRecord) -> StorageResult<()> {
        self.push(record.clone());
        Ok(())
    }
}
