//! Card-Harvest: a resumable trading-card price crawler
//!
//! This crate walks a catalog site category by category, expands each set into
//! its card pages, extracts pricing and grading fields per card and appends them
//! to a per-category store. Runs are resumable: cards already present in a store
//! are never extracted or written again.

pub mod config;
pub mod crawler;
pub mod driver;
pub mod output;
pub mod record;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Card-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page driver error: {0}")]
    Driver(#[from] driver::DriverError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Timed out waiting for set links on {url}")]
    DiscoveryTimeout { url: String },

    #[error("Timed out waiting for card links on {url}")]
    SetExpansionTimeout { url: String },

    #[error("Extraction of {url} failed after {attempts} attempts")]
    ExtractionExhausted { url: String, attempts: u32 },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for {name}: {selector}")]
    InvalidSelector { name: String, selector: String },
}

/// Result type alias for Card-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlOrchestrator};
pub use output::CategoryReport;
pub use driver::{HttpPageDriver, PageDriver};
pub use record::CardRecord;
pub use storage::CardStore;
