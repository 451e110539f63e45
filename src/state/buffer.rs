use crate::record::CardRecord;
use std::collections::HashSet;

/// Card URLs that must not be extracted again
///
/// Seeded from the store when a category starts and extended with every card
/// extracted during the run. Cards that failed extraction are never added.
#[derive(Debug, Clone, Default)]
pub struct ResumeSet {
    urls: HashSet<String>,
}

impl ResumeSet {
    pub fn new(urls: HashSet<String>) -> Self {
        Self { urls }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Returns false if the URL was already present
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Records extracted since the last flush
#[derive(Debug)]
pub struct WriteBuffer {
    records: Vec<CardRecord>,
    threshold: usize,
}

impl WriteBuffer {
    pub fn new(threshold: usize) -> Self {
        Self {
            records: Vec::with_capacity(threshold),
            threshold: threshold.max(1),
        }
    }

    pub fn push(&mut self, record: CardRecord) {
        self.records.push(record);
    }

    /// True once the buffer holds at least `threshold` records
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.threshold
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes and returns every buffered record in insertion order
    pub fn take(&mut self) -> Vec<CardRecord> {
        std::mem::replace(&mut self.records, Vec::with_capacity(self.threshold))
    }
}
