//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CardStore trait.
//! Unlike the CSV store, each flush runs in a single transaction.

use crate::record::CardRecord;
use crate::storage::schema::{initialize_schema, INSERT_CARD_SQL};
use crate::storage::traits::{CardStore, StorageResult};
use chrono::Utc;
use rusqlite::{params_from_iter, Connection};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// SQLite card store
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Loads a stored card back by its URL
    #[cfg(test)]
    pub fn get_card(&self, card_url: &str) -> StorageResult<Option<CardRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, raw_price, raw_volume, grade_7, grade_7_volume, grade_8,
                    grade_8_volume, grade_9, grade_9_volume, grade_9_5, grade_9_5_volume,
                    psa_10, psa_10_volume, rarity, model_number, image_url, card_url
             FROM cards WHERE card_url = ?1",
        )?;

        let mut rows = stmt.query([card_url])?;
        match rows.next()? {
            Some(row) => {
                let mut values = Vec::with_capacity(17);
                for i in 0..17 {
                    values.push(row.get::<_, String>(i)?);
                }
                Ok(CardRecord::from_row(&values))
            }
            None => Ok(None),
        }
    }
}

impl CardStore for SqliteStore {
    fn load_keys(&self) -> StorageResult<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT card_url FROM cards")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(keys)
    }

    fn append(&mut self, records: &[CardRecord]) -> StorageResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(INSERT_CARD_SQL)?;
            for record in records {
                let mut values = record.to_row();
                values.push(now.as_str());
                written += stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        if written < records.len() {
            tracing::debug!(
                "{} of {} cards were already stored in {}",
                records.len() - written,
                records.len(),
                self.path.display()
            );
        }

        Ok(written)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
