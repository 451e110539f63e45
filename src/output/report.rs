//! Per-category crawl reports

use chrono::{DateTime, Utc};

/// What happened while crawling one category
#[derive(Debug, Clone)]
pub struct CategoryReport {
    /// Category name from the configuration
    pub category: String,

    /// Store the category was written to
    pub store: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Card URLs already in the store when the category started
    pub previously_stored: usize,

    /// Set URLs returned by discovery
    pub sets_discovered: usize,

    /// Sets that timed out or failed to load
    pub sets_skipped: usize,

    /// Card URLs listed across all sets (after per-set dedup)
    pub cards_found: usize,

    /// Card URLs skipped because they were already stored or extracted
    pub cards_already_stored: usize,

    pub cards_extracted: usize,

    /// Cards dropped after exhausting their attempts
    pub cards_failed: usize,

    /// Flushes attempted, including failed ones
    pub flushes: usize,

    pub failed_flushes: usize,

    /// Rows the store reported as written
    pub rows_written: usize,

    /// Set when the category ended early (discovery timeout, store failure)
    pub failure: Option<String>,
}

impl CategoryReport {
    pub fn new(category: impl Into<String>, store: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            store: store.into(),
            started_at: Utc::now(),
            finished_at: None,
            previously_stored: 0,
            sets_discovered: 0,
            sets_skipped: 0,
            cards_found: 0,
            cards_already_stored: 0,
            cards_extracted: 0,
            cards_failed: 0,
            flushes: 0,
            failed_flushes: 0,
            rows_written: 0,
            failure: None,
        }
    }

    /// Marks the report finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Marks the report finished with a failure reason
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.failure = Some(reason.into());
        self.finish();
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Logs a one-line summary per category
pub fn log_reports(reports: &[CategoryReport]) {
    for report in reports {
        match &report.failure {
            None => tracing::info!(
                "{}: {} sets ({} skipped), {} cards found, {} already stored, {} extracted, {} failed, {} rows written in {} flushes{}",
                report.category,
                report.sets_discovered,
                report.sets_skipped,
                report.cards_found,
                report.cards_already_stored,
                report.cards_extracted,
                report.cards_failed,
                report.rows_written,
                report.flushes,
                if report.failed_flushes > 0 {
                    format!(" ({} failed)", report.failed_flushes)
                } else {
                    String::new()
                }
            ),
            Some(reason) => tracing::error!("{}: stopped early: {}", report.category, reason),
        }
    }
}
