//! Storage traits and error types
//!
//! This module defines the trait interface for card stores and associated
//! error types.

use crate::record::CardRecord;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store {path} has no '{column}' column")]
    MissingKeyColumn { path: PathBuf, column: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only record store keyed by card URL
///
/// Stores never update or delete rows. A card URL present in the store is
/// considered done and will not be extracted again.
pub trait CardStore {
    /// Returns every card URL already persisted
    ///
    /// Returns an empty set if the store does not exist yet.
    fn load_keys(&self) -> StorageResult<HashSet<String>>;

    /// Appends records in order
    ///
    /// A failure part way through may leave some of the batch written. Returns
    /// the number of rows written.
    fn append(&mut self, records: &[CardRecord]) -> StorageResult<usize>;

    /// Number of rows currently stored
    fn count(&self) -> StorageResult<u64>;

    /// Human-readable location of the store, for logs
    fn describe(&self) -> String;
}
