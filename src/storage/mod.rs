//! Storage module for persisting extracted cards
//!
//! This module handles every write the crawler makes:
//! - CSV stores with the fixed 17-column layout (the default)
//! - SQLite stores keyed by card URL
//! - Loading the card URLs of previous runs for resumption

mod csv_store;
mod schema;
mod sqlite;
mod traits;

pub use csv_store::CsvStore;
pub use sqlite::SqliteStore;
pub use traits::{CardStore, StorageError, StorageResult};

use std::path::Path;

/// Store backend, chosen from the store path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Csv,
    Sqlite,
}

impl StoreKind {
    /// `.db`, `.sqlite` and `.sqlite3` select SQLite; anything else is CSV
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("db" | "sqlite" | "sqlite3") => Self::Sqlite,
            _ => Self::Csv,
        }
    }
}

/// Opens the store at `path`, creating it lazily on first write
///
/// # Returns
///
/// * `Ok(Box<dyn CardStore>)` - Store ready for `load_keys`/`append`
/// * `Err(StorageError)` - The SQLite database could not be opened
pub fn open_store(path: &Path) -> StorageResult<Box<dyn CardStore>> {
    match StoreKind::from_path(path) {
        StoreKind::Csv => Ok(Box::new(CsvStore::new(path))),
        StoreKind::Sqlite => Ok(Box::new(SqliteStore::new(path)?)),
    }
}
