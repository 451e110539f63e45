//! Crawler module for walking the catalog
//!
//! This module contains the core crawling logic, including:
//! - Set discovery on category pages
//! - Card listing on set pages
//! - Card extraction with bounded retries
//! - Request pacing
//! - Overall crawl orchestration

mod coordinator;
mod discoverer;
mod expander;
mod extractor;
mod scheduler;

pub use coordinator::CrawlOrchestrator;
pub use discoverer::CategoryDiscoverer;
pub use expander::SetExpander;
pub use extractor::{CardExtractor, ExtractError};
pub use scheduler::Pacer;

use crate::config::{CategoryEntry, Config};
use crate::driver::HttpPageDriver;
use crate::output::CategoryReport;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Select the categories to crawl (all of them when `only` is empty)
/// 2. Build the HTTP page driver
/// 3. Crawl each category in configuration order
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `only` - Category names to restrict the run to
///
/// # Returns
///
/// * `Ok(Vec<CategoryReport>)` - One report per crawled category
/// * `Err(HarvestError)` - An unknown category was named or the driver could not be built
pub async fn run_crawl(config: &Config, only: &[String]) -> Result<Vec<CategoryReport>, HarvestError> {
    let categories = select_categories(config, only)?;
    let driver = HttpPageDriver::new(&config.driver)?;

    let mut orchestrator = CrawlOrchestrator::new(driver, config.crawler.clone(), &config.selectors);
    Ok(orchestrator.run(&categories).await)
}

/// Resolves category names against the configuration, keeping configuration order
pub fn select_categories(config: &Config, only: &[String]) -> Result<Vec<CategoryEntry>, HarvestError> {
    if let Some(unknown) = only.iter().find(|name| config.category(name).is_none()) {
        return Err(HarvestError::UnknownCategory(unknown.clone()));
    }

    Ok(config
        .categories
        .iter()
        .filter(|c| only.is_empty() || only.contains(&c.name))
        .cloned()
        .collect())
}
