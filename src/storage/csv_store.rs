//! CSV storage implementation
//!
//! One file per category with the fixed column layout from
//! [`crate::record::COLUMNS`]. The header is written only when the file is
//! created; every later flush appends rows.
//!
//! A flush interrupted mid-write can leave the file ending in a cut-off row
//! with no trailing newline. That row's key is never trusted, and the next
//! append starts on a fresh line.

use crate::record::{CardRecord, COLUMNS, KEY_COLUMN};
use crate::storage::traits::{CardStore, StorageError, StorageResult};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// CSV file store
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Creates a store handle; the file is created on the first append
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the file is missing or has no bytes yet
    fn is_new(&self) -> StorageResult<bool> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// True if the file is non-empty and does not end with a newline
    fn has_partial_tail(&self) -> StorageResult<bool> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }

        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn reader(&self) -> StorageResult<csv::Reader<File>> {
        // Flexible, so a row cut short by an interrupted flush does not hide the rest
        Ok(csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?)
    }
}

impl CardStore for CsvStore {
    fn load_keys(&self) -> StorageResult<HashSet<String>> {
        if self.is_new()? {
            return Ok(HashSet::new());
        }

        let mut reader = self.reader()?;
        let key_index = reader
            .headers()?
            .iter()
            .position(|h| h.trim() == KEY_COLUMN)
            .ok_or_else(|| StorageError::MissingKeyColumn {
                path: self.path.clone(),
                column: KEY_COLUMN.to_string(),
            })?;

        let mut keys = HashSet::new();
        let mut last_key: Option<String> = None;
        for row in reader.records() {
            let row = row?;
            // Every row but the last is known to be complete
            keys.extend(last_key.take());
            last_key = row
                .get(key_index)
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(String::from);
        }

        if let Some(key) = last_key {
            if self.has_partial_tail()? {
                tracing::warn!(
                    "Ignoring cut-off last row of {} (key '{}')",
                    self.path.display(),
                    key
                );
            } else {
                keys.insert(key);
            }
        }

        Ok(keys)
    }

    fn append(&mut self, records: &[CardRecord]) -> StorageResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let write_header = self.is_new()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let partial_tail = !write_header && self.has_partial_tail()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if partial_tail {
            tracing::warn!(
                "{} ends in a cut-off row, starting a new line",
                self.path.display()
            );
            file.write_all(b"\n")?;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(COLUMNS)?;
        }
        for record in records {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;

        Ok(records.len())
    }

    fn count(&self) -> StorageResult<u64> {
        if self.is_new()? {
            return Ok(0);
        }

        let mut count = 0;
        for row in self.reader()?.records() {
            row?;
            count += 1;
        }
        Ok(count)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
