//! Scripted in-memory driver for unit tests

use super::{DriverError, DriverResult, ElementSnapshot, PageDriver};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct MockPage {
    elements: HashMap<String, Vec<ElementSnapshot>>,
    heights: Vec<u64>,
    height_cursor: usize,
    failing_loads: u32,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<ElementSnapshot>) -> Self {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .extend(elements);
        self
    }

    pub fn with_text(self, selector: &str, text: &str) -> Self {
        self.with_elements(selector, vec![ElementSnapshot::new(text)])
    }

    /// Anchors with the given hrefs and labels
    pub fn with_links(self, selector: &str, links: &[(&str, &str)]) -> Self {
        let elements = links
            .iter()
            .map(|(href, label)| ElementSnapshot::new(*label).with_attribute("href", *href))
            .collect();
        self.with_elements(selector, elements)
    }

    /// Successive values returned by `page_height`; the last one repeats
    pub fn with_heights(mut self, heights: &[u64]) -> Self {
        self.heights = heights.to_vec();
        self
    }

    /// The first `n` navigations to this page fail
    pub fn failing_first(mut self, n: u32) -> Self {
        self.failing_loads = n;
        self
    }
}

#[derive(Debug, Default)]
pub struct MockDriver {
    pages: HashMap<String, MockPage>,
    current: Option<String>,
    pub navigations: Vec<String>,
    pub scrolls: u32,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn add_page(&mut self, url: &str, page: MockPage) {
        self.pages.insert(url.to_string(), page);
    }

    /// Number of times `url` was navigated to
    pub fn visits(&self, url: &str) -> usize {
        self.navigations.iter().filter(|u| *u == url).count()
    }

    fn current_page(&mut self) -> DriverResult<&mut MockPage> {
        let url = self.current.as_ref().ok_or(DriverError::NoPage)?;
        self.pages.get_mut(url).ok_or(DriverError::NoPage)
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    type Element = ElementSnapshot;

    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.navigations.push(url.to_string());
        self.current = None;

        let page = self.pages.get_mut(url).ok_or_else(|| DriverError::Status {
            url: url.to_string(),
            status: 404,
        })?;

        if page.failing_loads > 0 {
            page.failing_loads -= 1;
            return Err(DriverError::Other(format!("connection reset loading {url}")));
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> DriverResult<bool> {
        let found = self
            .current_page()?
            .elements
            .get(selector)
            .is_some_and(|els| !els.is_empty());
        if !found {
            tokio::time::sleep(timeout).await;
        }
        Ok(found)
    }

    async fn find_all(&mut self, selector: &str) -> DriverResult<Vec<ElementSnapshot>> {
        Ok(self
            .current_page()?
            .elements
            .get(selector)
            .cloned()
            .unwrap_or_default())
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
        self.current_page()?;
        self.scrolls += 1;
        Ok(())
    }

    async fn page_height(&mut self) -> DriverResult<u64> {
        let page = self.current_page()?;
        if page.heights.is_empty() {
            return Ok(1_000);
        }
        let index = page.height_cursor.min(page.heights.len() - 1);
        page.height_cursor += 1;
        Ok(page.heights[index])
    }
}
