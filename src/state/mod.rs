//! State module for tracking crawl progress
//!
//! This module provides the per-category state owned by the orchestrator.
//!
//! # Components
//!
//! - `CrawlPhase`: where a category's crawl currently stands
//! - `ResumeSet`: card URLs that are already stored or were stored this run
//! - `WriteBuffer`: extracted records waiting for the next flush

mod buffer;
mod phase;

// Re-export main types
pub use buffer::{ResumeSet, WriteBuffer};
pub use phase::CrawlPhase;
