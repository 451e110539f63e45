//! Set discovery on a category page

use crate::config::{CrawlerConfig, SelectorConfig};
use crate::driver::PageDriver;
use crate::HarvestError;
use std::collections::HashSet;
use std::time::Duration;

/// Finds the set pages listed on a category page
#[derive(Debug, Clone)]
pub struct CategoryDiscoverer {
    set_link: String,
    wait_timeout: Duration,
    stable_rounds: u32,
    max_scroll_rounds: u32,
    scroll_poll: Duration,
}

impl CategoryDiscoverer {
    pub fn new(crawler: &CrawlerConfig, selectors: &SelectorConfig) -> Self {
        Self {
            set_link: selectors.set_link.clone(),
            wait_timeout: crawler.wait_timeout(),
            stable_rounds: crawler.scroll_stable_threshold,
            max_scroll_rounds: crawler.max_scroll_rounds,
            scroll_poll: crawler.scroll_poll_interval(),
        }
    }

    /// Collects the set URLs of a category
    ///
    /// Keeps links whose URL or label contains `filter` (case-insensitive) and
    /// drops exact duplicates, keeping first-seen order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Set URLs, possibly empty
    /// * `Err(HarvestError::DiscoveryTimeout)` - No set link appeared in time
    /// * `Err(HarvestError::Driver)` - The page could not be loaded or queried
    pub async fn discover_sets<D: PageDriver>(
        &self,
        driver: &mut D,
        start_url: &str,
        filter: &str,
    ) -> Result<Vec<String>, HarvestError> {
        driver.navigate(start_url).await?;

        if !driver
            .wait_for_selector(&self.set_link, self.wait_timeout)
            .await?
        {
            return Err(HarvestError::DiscoveryTimeout {
                url: start_url.to_string(),
            });
        }

        let scroll = driver
            .scroll_until_stable(self.stable_rounds, self.max_scroll_rounds, self.scroll_poll)
            .await?;
        tracing::debug!(
            "Category page settled after {} scroll rounds (height {})",
            scroll.rounds,
            scroll.final_height
        );

        let keyword = filter.to_lowercase();
        let mut seen = HashSet::new();
        let mut sets = Vec::new();

        for link in driver.find_all(&self.set_link).await? {
            let Some(url) = driver.attribute(&link, "href").await? else {
                continue;
            };
            let url = url.trim().to_string();
            if url.is_empty() {
                continue;
            }

            let label = driver.text(&link).await?.trim().to_lowercase();
            if !url.to_lowercase().contains(&keyword) && !label.contains(&keyword) {
                continue;
            }

            if seen.insert(url.clone()) {
                sets.push(url);
            }
        }

        tracing::info!("Found {} sets for {}", sets.len(), filter);
        Ok(sets)
    }
}
