//! Output module for crawl reports and store statistics
//!
//! This module handles:
//! - Per-category crawl reports returned by the orchestrator
//! - Row counts of existing stores for the `--stats` command

mod report;
pub mod stats;

pub use report::{log_reports, CategoryReport};
pub use stats::{load_statistics, print_statistics, StoreStatistics};
