//! HTTP-backed page driver
//!
//! Fetches pages with `reqwest` and queries them with `scraper`. Pages are
//! treated as static documents: scrolling never reveals new content, so a
//! stabilizing scroll settles as soon as the stable threshold is reached.
//! A document never changes once fetched, so waiting for a selector checks
//! the loaded page once and issues no further requests.

use super::{DriverError, DriverResult, ElementSnapshot, PageDriver};
use crate::config::DriverConfig;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Attributes resolved against the page URL, as a browser's DOM properties are
const URL_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// Builds the HTTP client used by [`HttpPageDriver`]
pub fn build_http_client(config: &DriverConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

struct LoadedPage {
    url: Url,
    body: String,
}

/// Page driver over plain HTTP requests
pub struct HttpPageDriver {
    client: Client,
    current: Option<LoadedPage>,
}

impl HttpPageDriver {
    /// Creates a driver with its own HTTP client
    pub fn new(config: &DriverConfig) -> DriverResult<Self> {
        let client = build_http_client(config).map_err(DriverError::Client)?;
        Ok(Self::with_client(client))
    }

    /// Creates a driver around an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    fn page(&self) -> DriverResult<&LoadedPage> {
        self.current.as_ref().ok_or(DriverError::NoPage)
    }

    async fn fetch(&self, url: Url) -> DriverResult<LoadedPage> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| DriverError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriverError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Relative links resolve against the final URL after redirects
        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| DriverError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(LoadedPage {
            url: final_url,
            body,
        })
    }
}

fn parse_selector(selector: &str) -> DriverResult<Selector> {
    Selector::parse(selector).map_err(|_| DriverError::InvalidSelector(selector.to_string()))
}

fn has_match(page: &LoadedPage, selector: &str) -> DriverResult<bool> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(&page.body);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

/// Collapses runs of whitespace the way rendered text does
fn visible_text<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let joined: String = fragments.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn snapshot(page: &LoadedPage, selector: &Selector) -> Vec<ElementSnapshot> {
    let document = Html::parse_document(&page.body);
    document
        .select(selector)
        .map(|element| {
            let mut snapshot = ElementSnapshot::new(visible_text(element.text()));
            for (name, value) in element.value().attrs() {
                let value = if URL_ATTRIBUTES.contains(&name) {
                    page.url
                        .join(value.trim())
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| value.to_string())
                } else {
                    value.to_string()
                };
                snapshot.attributes.insert(name.to_string(), value);
            }
            snapshot
        })
        .collect()
}

#[async_trait]
impl PageDriver for HttpPageDriver {
    type Element = ElementSnapshot;

    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        let parsed = Url::parse(url).map_err(|source| DriverError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        self.current = None;
        tracing::trace!("GET {}", parsed);
        self.current = Some(self.fetch(parsed).await?);
        Ok(())
    }

    /// Checks the loaded document once; `_timeout` never needs to elapse
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> DriverResult<bool> {
        let found = has_match(self.page()?, selector)?;
        if !found {
            tracing::debug!("{} not found on {}", selector, self.page()?.url);
        }
        Ok(found)
    }

    async fn find_all(&mut self, selector: &str) -> DriverResult<Vec<ElementSnapshot>> {
        let parsed = parse_selector(selector)?;
        Ok(snapshot(self.page()?, &parsed))
    }

    async fn text(&mut self, element: &ElementSnapshot) -> DriverResult<String> {
        Ok(element.text.clone())
    }

    async fn attribute(
        &mut self,
        element: &ElementSnapshot,
        name: &str,
    ) -> DriverResult<Option<String>> {
        Ok(element.attributes.get(name).cloned())
    }

    async fn scroll_to_bottom(&mut self) -> DriverResult<()> {
        self.page().map(|_| ())
    }

    async fn page_height(&mut self) -> DriverResult<u64> {
        Ok(self.page()?.body.len() as u64)
    }
}
