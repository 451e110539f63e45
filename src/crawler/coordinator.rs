//! Crawl orchestration
//!
//! This module contains the per-category crawl loop that coordinates:
//! - Loading previously stored card URLs for resumption
//! - Discovering sets and expanding them into card URLs
//! - Extracting new cards with pacing between page visits
//! - Buffering records and flushing them to the category store

use crate::config::{CategoryEntry, CrawlerConfig, SelectorConfig};
use crate::crawler::discoverer::CategoryDiscoverer;
use crate::crawler::expander::SetExpander;
use crate::crawler::extractor::CardExtractor;
use crate::crawler::scheduler::Pacer;
use crate::driver::PageDriver;
use crate::output::CategoryReport;
use crate::state::{CrawlPhase, ResumeSet, WriteBuffer};
use crate::storage::{open_store, CardStore};
use crate::HarvestError;
use std::path::Path;

/// Drives one page driver through every configured category
pub struct CrawlOrchestrator<D: PageDriver> {
    driver: D,
    config: CrawlerConfig,
    discoverer: CategoryDiscoverer,
    expander: SetExpander,
    extractor: CardExtractor,
    pacer: Pacer,
}

impl<D: PageDriver> CrawlOrchestrator<D> {
    /// Creates a new orchestrator owning `driver`
    pub fn new(driver: D, config: CrawlerConfig, selectors: &SelectorConfig) -> Self {
        Self {
            discoverer: CategoryDiscoverer::new(&config, selectors),
            expander: SetExpander::new(&config, selectors),
            extractor: CardExtractor::new(&config, selectors),
            pacer: Pacer::new(config.pacing_range()),
            driver,
            config,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Crawls each category in order, opening its store from the configured path
    ///
    /// A category that cannot open or read its store yields a failed report;
    /// the remaining categories still run.
    pub async fn run(&mut self, categories: &[CategoryEntry]) -> Vec<CategoryReport> {
        let mut reports = Vec::with_capacity(categories.len());

        for category in categories {
            let report = match open_store(Path::new(&category.store)) {
                Ok(mut store) => match self.crawl_category(category, store.as_mut()).await {
                    Ok(report) => report,
                    Err(e) => failed_report(category, e),
                },
                Err(e) => failed_report(category, e.into()),
            };
            reports.push(report);
        }

        reports
    }

    /// Crawls one category into `store`
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryReport)` - The category ran; a discovery timeout is
    ///   recorded in the report's `failure`
    /// * `Err(HarvestError)` - The store's existing keys could not be read
    pub async fn crawl_category(
        &mut self,
        category: &CategoryEntry,
        store: &mut dyn CardStore,
    ) -> Result<CategoryReport, HarvestError> {
        let mut report = CategoryReport::new(&category.name, store.describe());
        let mut phase = CrawlPhase::Init;

        let mut resume = ResumeSet::new(store.load_keys()?);
        let mut buffer = WriteBuffer::new(self.config.flush_threshold);
        report.previously_stored = resume.len();
        tracing::info!(
            "Starting category {} ({} cards already in {})",
            category.name,
            resume.len(),
            report.store
        );

        advance(&mut phase, CrawlPhase::DiscoveringSets);
        let sets = match self
            .discoverer
            .discover_sets(&mut self.driver, &category.start_url, &category.filter)
            .await
        {
            Ok(sets) => sets,
            Err(e) => {
                tracing::error!("Discovery failed for {}: {}", category.name, e);
                advance(&mut phase, CrawlPhase::Done);
                report.fail(e.to_string());
                return Ok(report);
            }
        };
        report.sets_discovered = sets.len();

        for (index, set_url) in sets.iter().enumerate() {
            advance(&mut phase, CrawlPhase::ExpandingSet);
            self.pacer.pause().await;

            let cards = match self.expander.expand_set(&mut self.driver, set_url).await {
                Ok(cards) => cards,
                Err(e) => {
                    tracing::warn!("Skipping set {}: {}", set_url, e);
                    report.sets_skipped += 1;
                    continue;
                }
            };
            report.cards_found += cards.len();

            // Covers cards stored by earlier runs and cards listed by an earlier set
            let pending: Vec<&String> = cards.iter().filter(|url| !resume.contains(url)).collect();
            report.cards_already_stored += cards.len() - pending.len();
            tracing::info!(
                "Set {}/{} {}: {} cards, {} new",
                index + 1,
                sets.len(),
                set_url,
                cards.len(),
                pending.len()
            );
            if pending.is_empty() {
                continue;
            }

            advance(&mut phase, CrawlPhase::ExtractingCards);
            for card_url in pending {
                self.pacer.pause().await;
                match self.extractor.extract(&mut self.driver, card_url).await {
                    Ok(record) => {
                        tracing::debug!("Extracted {}: {}", card_url, record.name);
                        resume.insert(card_url.as_str());
                        buffer.push(record);
                        report.cards_extracted += 1;
                        if buffer.is_full() {
                            flush(&mut buffer, store, &mut report);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Dropping card: {}", e);
                        report.cards_failed += 1;
                    }
                }
            }
        }

        flush(&mut buffer, store, &mut report);
        advance(&mut phase, CrawlPhase::Done);
        report.finish();

        tracing::info!(
            "Finished category {}: {} extracted, {} failed, {} rows written",
            category.name,
            report.cards_extracted,
            report.cards_failed,
            report.rows_written
        );

        Ok(report)
    }
}

fn advance(phase: &mut CrawlPhase, next: CrawlPhase) {
    debug_assert!(
        phase.can_transition_to(next),
        "invalid phase transition {} -> {}",
        phase,
        next
    );
    tracing::trace!("Phase {} -> {}", phase, next);
    *phase = next;
}

/// Appends the buffered records, clearing the buffer whatever the outcome
fn flush(buffer: &mut WriteBuffer, store: &mut dyn CardStore, report: &mut CategoryReport) {
    if buffer.is_empty() {
        return;
    }

    let batch = buffer.take();
    report.flushes += 1;
    match store.append(&batch) {
        Ok(written) => {
            report.rows_written += written;
            tracing::info!("Flushed {} cards to {}", written, store.describe());
        }
        Err(e) => {
            report.failed_flushes += 1;
            tracing::error!(
                "Failed to write {} cards to {}: {}",
                batch.len(),
                store.describe(),
                e
            );
        }
    }
}

fn failed_report(category: &CategoryEntry, error: HarvestError) -> CategoryReport {
    tracing::error!("Category {} failed: {}", category.name, error);
    let mut report = CategoryReport::new(&category.name, &category.store);
    report.fail(error.to_string());
    report
}
