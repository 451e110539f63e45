use crate::config::types::{CategoryEntry, Config, CrawlerConfig, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_selectors(&config.selectors)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates crawler tunables
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.flush_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "flush-threshold must be >= 1, got {}",
            config.flush_threshold
        )));
    }

    if config.scroll_stable_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "scroll-stable-threshold must be >= 1, got {}",
            config.scroll_stable_threshold
        )));
    }

    if config.max_scroll_rounds < config.scroll_stable_threshold {
        return Err(ConfigError::Validation(format!(
            "max-scroll-rounds ({}) must be >= scroll-stable-threshold ({})",
            config.max_scroll_rounds, config.scroll_stable_threshold
        )));
    }

    if config.pacing_min_ms > config.pacing_max_ms {
        return Err(ConfigError::Validation(format!(
            "pacing-min-ms ({}) must not exceed pacing-max-ms ({})",
            config.pacing_min_ms, config.pacing_max_ms
        )));
    }

    Ok(())
}

/// Checks that every selector parses as CSS
fn validate_selectors(selectors: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in selectors.entries() {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                name: name.to_string(),
                selector: selector.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates category entries
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[category]] must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in categories {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name '{}'",
                entry.name
            )));
        }

        let url = Url::parse(&entry.start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid start-url '{}' for category '{}': {}",
                entry.start_url, entry.name, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "start-url '{}' must use http or https",
                entry.start_url
            )));
        }

        if entry.store.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty store path",
                entry.name
            )));
        }

        if entry.filter.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty filter keyword",
                entry.name
            )));
        }
    }

    Ok(())
}
