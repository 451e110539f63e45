//! Card page extraction with bounded retries
//!
//! An attempt fails only when the page is structurally unusable: the product
//! name never appears, or the driver itself errors. Optional fields (rarity,
//! model number, image) that are missing simply become "N/A".

use crate::config::{CrawlerConfig, SelectorConfig};
use crate::driver::{DriverError, PageDriver};
use crate::record::CardRecord;
use crate::HarvestError;
use std::time::Duration;
use thiserror::Error;

/// Why a single extraction attempt failed
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("product name '{selector}' did not appear")]
    NameTimeout { selector: String },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl ExtractError {
    /// Every attempt failure is worth retrying until the attempt budget runs out
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NameTimeout { .. } | Self::Driver(_) => true,
        }
    }
}

/// Extracts card records from card pages
#[derive(Debug, Clone)]
pub struct CardExtractor {
    selectors: SelectorConfig,
    max_retries: u32,
    backoff: Duration,
    wait_timeout: Duration,
}

impl CardExtractor {
    pub fn new(crawler: &CrawlerConfig, selectors: &SelectorConfig) -> Self {
        Self {
            selectors: selectors.clone(),
            max_retries: crawler.max_retries.max(1),
            backoff: crawler.retry_backoff(),
            wait_timeout: crawler.wait_timeout(),
        }
    }

    /// Extracts one card, retrying up to `max_retries` times
    ///
    /// Waits the fixed backoff between attempts (not after the last one).
    ///
    /// # Returns
    ///
    /// * `Ok(CardRecord)` - An attempt succeeded
    /// * `Err(HarvestError::ExtractionExhausted)` - Every attempt failed
    pub async fn extract<D: PageDriver>(
        &self,
        driver: &mut D,
        card_url: &str,
    ) -> Result<CardRecord, HarvestError> {
        let mut attempt = 0;
        while attempt < self.max_retries {
            attempt += 1;

            match self.attempt(driver, card_url).await {
                Ok(record) => return Ok(record),
                Err(e) => {
                    tracing::warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt,
                        self.max_retries,
                        card_url,
                        e
                    );
                    if !e.is_retryable() {
                        break;
                    }
                }
            }

            if attempt < self.max_retries {
                tokio::time::sleep(self.backoff).await;
            }
        }

        Err(HarvestError::ExtractionExhausted {
            url: card_url.to_string(),
            attempts: attempt,
        })
    }

    async fn attempt<D: PageDriver>(
        &self,
        driver: &mut D,
        card_url: &str,
    ) -> Result<CardRecord, ExtractError> {
        let name_timeout = || ExtractError::NameTimeout {
            selector: self.selectors.product_name.clone(),
        };

        driver.navigate(card_url).await?;
        if !driver
            .wait_for_selector(&self.selectors.product_name, self.wait_timeout)
            .await?
        {
            return Err(name_timeout());
        }

        let name = first_text(driver, &self.selectors.product_name)
            .await?
            .ok_or_else(name_timeout)?;

        let prices = all_texts(driver, &self.selectors.price).await?;
        let volumes = all_texts(driver, &self.selectors.volume)
            .await?
            .into_iter()
            .map(|v| v.replace("volume:", "").trim().to_string())
            .collect();

        let rarity = first_text(driver, &self.selectors.rarity).await?;
        let model_number = first_text(driver, &self.selectors.model_number).await?;
        let image_url = first_attribute(driver, &self.selectors.image, "src").await?;

        Ok(CardRecord::new(name, prices, volumes, card_url)
            .with_rarity(rarity)
            .with_model_number(model_number)
            .with_image_url(image_url))
    }
}

async fn all_texts<D: PageDriver>(driver: &mut D, selector: &str) -> Result<Vec<String>, DriverError> {
    let mut texts = Vec::new();
    for element in driver.find_all(selector).await? {
        texts.push(driver.text(&element).await?.trim().to_string());
    }
    Ok(texts)
}

async fn first_text<D: PageDriver>(
    driver: &mut D,
    selector: &str,
) -> Result<Option<String>, DriverError> {
    match driver.find_all(selector).await?.first() {
        Some(element) => Ok(Some(driver.text(element).await?.trim().to_string())),
        None => Ok(None),
    }
}

async fn first_attribute<D: PageDriver>(
    driver: &mut D,
    selector: &str,
    name: &str,
) -> Result<Option<String>, DriverError> {
    match driver.find_all(selector).await?.first() {
        Some(element) => driver.attribute(element, name).await,
        None => Ok(None),
    }
}
