//! Page driver boundary
//!
//! The crawler never talks to the network directly. Everything it needs from a
//! rendered page goes through the [`PageDriver`] trait:
//! - navigating a single stateful session to a URL
//! - waiting for a selector with a timeout
//! - querying elements, their text and attributes
//! - scrolling and measuring the page for lazy-loaded content

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{build_http_client, HttpPageDriver};

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a page driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("No page loaded")]
    NoPage,

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Driver error: {0}")]
    Other(String),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// A detached copy of an element's text and attributes
///
/// Drivers that read from a static document hand these out as their element
/// handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub text: String,
    pub attributes: HashMap<String, String>,
}

impl ElementSnapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Outcome of a stabilizing scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Scroll rounds performed
    pub rounds: u32,

    /// Page height after the last round
    pub final_height: u64,

    /// False if the round cap was hit before the height settled
    pub stabilized: bool,
}

/// The capabilities the crawler requires from a page-rendering session
///
/// One driver instance is one session; calls are issued strictly in sequence.
#[async_trait]
pub trait PageDriver: Send {
    /// Handle to an element on the current page
    type Element: Send + Sync;

    /// Loads `url` into the session
    async fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Waits until `selector` matches at least one element
    ///
    /// Returns `Ok(false)` if nothing matched within `timeout`.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration)
        -> DriverResult<bool>;

    /// Returns every element matching `selector`, in document order
    async fn find_all(&mut self, selector: &str) -> DriverResult<Vec<Self::Element>>;

    /// Visible text of an element
    async fn text(&mut self, element: &Self::Element) -> DriverResult<String>;

    /// Attribute value of an element, or None if it is not set
    async fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> DriverResult<Option<String>>;

    /// Scrolls the viewport to the bottom of the page
    async fn scroll_to_bottom(&mut self) -> DriverResult<()>;

    /// Current scrollable height of the page
    async fn page_height(&mut self) -> DriverResult<u64>;

    /// Scrolls until the page height stops changing
    ///
    /// Each round scrolls to the bottom, waits `poll_interval` and measures the
    /// height. An unchanged height counts towards `stable_rounds`; any growth
    /// resets the count. Scrolling stops once the count reaches `stable_rounds`
    /// or after `max_rounds` rounds, whichever comes first.
    async fn scroll_until_stable(
        &mut self,
        stable_rounds: u32,
        max_rounds: u32,
        poll_interval: Duration,
    ) -> DriverResult<ScrollOutcome> {
        let mut last_height = self.page_height().await?;
        let mut unchanged = 0;
        let mut rounds = 0;

        while rounds < max_rounds {
            self.scroll_to_bottom().await?;
            tokio::time::sleep(poll_interval).await;
            rounds += 1;

            let height = self.page_height().await?;
            if height == last_height {
                unchanged += 1;
                if unchanged >= stable_rounds {
                    return Ok(ScrollOutcome {
                        rounds,
                        final_height: height,
                        stabilized: true,
                    });
                }
            } else {
                unchanged = 0;
                last_height = height;
            }
        }

        tracing::warn!(
            "Page still growing after {} scroll rounds (height {})",
            rounds,
            last_height
        );
        Ok(ScrollOutcome {
            rounds,
            final_height: last_height,
            stabilized: false,
        })
    }
}
