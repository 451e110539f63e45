use serde::Deserialize;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Main configuration structure for Card-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(rename = "category", default)]
    pub categories: Vec<CategoryEntry>,
}

impl Config {
    /// Looks up a category by name
    pub fn category(&self, name: &str) -> Option<&CategoryEntry> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Crawl tunables, immutable for the duration of a run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Extraction attempts per card before it is dropped
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Buffered records that trigger a flush to the store
    #[serde(rename = "flush-threshold")]
    pub flush_threshold: usize,

    /// Consecutive unchanged page heights that end a scroll
    #[serde(rename = "scroll-stable-threshold")]
    pub scroll_stable_threshold: u32,

    /// Upper bound on scroll rounds for pages that keep growing
    #[serde(rename = "max-scroll-rounds")]
    pub max_scroll_rounds: u32,

    /// Selector wait timeout (milliseconds)
    #[serde(rename = "wait-timeout-ms")]
    pub wait_timeout_ms: u64,

    /// Delay between extraction attempts (milliseconds)
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,

    /// Pause after each scroll before measuring the page (milliseconds)
    #[serde(rename = "scroll-poll-interval-ms")]
    pub scroll_poll_interval_ms: u64,

    /// Lower bound of the pacing delay between requests (milliseconds)
    #[serde(rename = "pacing-min-ms")]
    pub pacing_min_ms: u64,

    /// Upper bound of the pacing delay between requests (milliseconds)
    #[serde(rename = "pacing-max-ms")]
    pub pacing_max_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            flush_threshold: 25,
            scroll_stable_threshold: 3,
            max_scroll_rounds: 200,
            wait_timeout_ms: 25_000,
            retry_backoff_ms: 5_000,
            scroll_poll_interval_ms: 2_500,
            pacing_min_ms: 2_000,
            pacing_max_ms: 5_000,
        }
    }
}

impl CrawlerConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn scroll_poll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_poll_interval_ms)
    }

    pub fn pacing_range(&self) -> RangeInclusive<Duration> {
        Duration::from_millis(self.pacing_min_ms)..=Duration::from_millis(self.pacing_max_ms)
    }

    /// A configuration with every delay set to zero (for tests and replays)
    pub fn without_delays() -> Self {
        Self {
            wait_timeout_ms: 0,
            retry_backoff_ms: 0,
            scroll_poll_interval_ms: 0,
            pacing_min_ms: 0,
            pacing_max_ms: 0,
            ..Self::default()
        }
    }
}

/// Settings for the bundled HTTP page driver
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("card-harvest/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_ms: 30_000,
        }
    }
}

/// CSS selectors describing the catalog markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Anchors on a category page that lead to sets
    #[serde(rename = "set-link")]
    pub set_link: String,

    /// Anchors on a set page that lead to cards
    #[serde(rename = "card-link")]
    pub card_link: String,

    #[serde(rename = "product-name")]
    pub product_name: String,

    pub price: String,

    pub volume: String,

    pub rarity: String,

    #[serde(rename = "model-number")]
    pub model_number: String,

    /// High resolution card image
    pub image: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            set_link: "a[href*='/console/']".to_string(),
            card_link: "td.title a".to_string(),
            product_name: "h1#product_name".to_string(),
            price: "span.price.js-price".to_string(),
            volume: "td.js-show-tab".to_string(),
            rarity: "td.details[itemprop='description']".to_string(),
            model_number: "td.details[itemprop='model-number']".to_string(),
            image: "img[src*='1600.jpg']".to_string(),
        }
    }
}

impl SelectorConfig {
    /// All selectors paired with their config key, for validation
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("set-link", self.set_link.as_str()),
            ("card-link", self.card_link.as_str()),
            ("product-name", self.product_name.as_str()),
            ("price", self.price.as_str()),
            ("volume", self.volume.as_str()),
            ("rarity", self.rarity.as_str()),
            ("model-number", self.model_number.as_str()),
            ("image", self.image.as_str()),
        ]
    }
}

/// One category to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Short name used in logs and on the command line
    pub name: String,

    /// Category page listing the sets
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Store file for this category (`.csv`, or `.db`/`.sqlite` for SQLite)
    pub store: String,

    /// Keyword a set URL or label must contain to be crawled
    pub filter: String,
}
