//! Statistics over existing card stores
//!
//! This module backs the `--stats` command: it opens each category's store
//! and reports how many cards it holds.

use crate::config::CategoryEntry;
use crate::storage::{open_store, StoreKind};
use crate::HarvestError;
use std::path::Path;

/// Row count for one category's store
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    pub category: String,
    pub store: String,
    pub kind: StoreKind,
    pub rows: u64,
}

/// Loads statistics for each category
///
/// # Arguments
///
/// * `categories` - The categories whose stores should be inspected
///
/// # Returns
///
/// * `Ok(Vec<StoreStatistics>)` - One entry per category, in order
/// * `Err(HarvestError)` - A store could not be read
pub fn load_statistics(categories: &[CategoryEntry]) -> Result<Vec<StoreStatistics>, HarvestError> {
    let mut stats = Vec::with_capacity(categories.len());
    for category in categories {
        let path = Path::new(&category.store);
        // Opening a SQLite store would create it
        let rows = if path.exists() {
            open_store(path)?.count()?
        } else {
            0
        };
        stats.push(StoreStatistics {
            category: category.name.clone(),
            store: path.display().to_string(),
            kind: StoreKind::from_path(path),
            rows,
        });
    }
    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &[StoreStatistics]) {
    println!("=== Store Statistics ===\n");

    for entry in stats {
        println!("{}:", entry.category);
        println!("  Store: {} ({:?})", entry.store, entry.kind);
        println!("  Cards: {}", entry.rows);
    }
    println!();

    let total: u64 = stats.iter().map(|s| s.rows).sum();
    println!("Total cards: {} across {} stores", total, stats.len());
}
