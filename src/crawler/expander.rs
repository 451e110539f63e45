//! Card listing on a set page

use crate::config::{CrawlerConfig, SelectorConfig};
use crate::driver::PageDriver;
use crate::HarvestError;
use std::collections::HashSet;
use std::time::Duration;

/// Expands a set page into the card URLs it lists
#[derive(Debug, Clone)]
pub struct SetExpander {
    card_link: String,
    wait_timeout: Duration,
    stable_rounds: u32,
    max_scroll_rounds: u32,
    scroll_poll: Duration,
}

impl SetExpander {
    pub fn new(crawler: &CrawlerConfig, selectors: &SelectorConfig) -> Self {
        Self {
            card_link: selectors.card_link.clone(),
            wait_timeout: crawler.wait_timeout(),
            stable_rounds: crawler.scroll_stable_threshold,
            max_scroll_rounds: crawler.max_scroll_rounds,
            scroll_poll: crawler.scroll_poll_interval(),
        }
    }

    /// Lists the card URLs of a set
    ///
    /// Scrolls until the infinite-scroll listing stops growing, then collects
    /// every card link. Missing or empty hrefs are dropped and duplicates keep
    /// their first position.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Card URLs in page order, possibly empty
    /// * `Err(HarvestError::SetExpansionTimeout)` - No card link appeared in time
    /// * `Err(HarvestError::Driver)` - The page could not be loaded or queried
    pub async fn expand_set<D: PageDriver>(
        &self,
        driver: &mut D,
        set_url: &str,
    ) -> Result<Vec<String>, HarvestError> {
        driver.navigate(set_url).await?;

        if !driver
            .wait_for_selector(&self.card_link, self.wait_timeout)
            .await?
        {
            return Err(HarvestError::SetExpansionTimeout {
                url: set_url.to_string(),
            });
        }

        let scroll = driver
            .scroll_until_stable(self.stable_rounds, self.max_scroll_rounds, self.scroll_poll)
            .await?;
        if scroll.stabilized {
            tracing::debug!(
                "Set {} settled at height {} after {} scroll rounds",
                set_url,
                scroll.final_height,
                scroll.rounds
            );
        } else {
            tracing::warn!(
                "Set {} kept loading after {} scroll rounds, listing may be incomplete",
                set_url,
                scroll.rounds
            );
        }

        let mut seen = HashSet::new();
        let mut cards = Vec::new();
        for link in driver.find_all(&self.card_link).await? {
            let Some(href) = driver.attribute(&link, "href").await? else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() {
                continue;
            }
            if seen.insert(href.to_string()) {
                cards.push(href.to_string());
            }
        }

        Ok(cards)
    }
}
