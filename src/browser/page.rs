use crate::config::ScrollConfig;
use crate::model::{BrowserError, ScraperError};
use crate::scraper::Fetcher;

use ::scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// When a navigation counts as finished. Fetched HTML is complete once the
/// body arrives, so `HtmlPage` only records the policy in its logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub network_idle: bool,
    pub dom_ready: bool,
}

impl WaitPolicy {
    pub const SETTLED: WaitPolicy = WaitPolicy { network_idle: true, dom_ready: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub position: u32,
    pub height: u32,
}

fn selector(query: &str) -> Result<Selector, BrowserError> {
    Selector::parse(query).map_err(|_| BrowserError::InvalidSelector(query.to_string()))
}

fn select_in(scope: ElementRef<'_>, query: &str) -> Result<Vec<Element>, BrowserError> {
    let selector = selector(query)?;
    Ok(scope
        .select(&selector)
        .map(|el| Element { html: el.html() })
        .collect())
}

/// Snapshot of one element taken from a loaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    html: String,
}

impl Element {
    #[cfg(test)]
    pub fn from_html(html: &str) -> Self {
        Self { html: html.to_string() }
    }

    fn with_root<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let fragment = Html::parse_fragment(&self.html);
        let root = fragment.root_element().children().find_map(ElementRef::wrap)?;
        Some(f(root))
    }

    pub fn query(&self, query: &str) -> Result<Option<Element>, BrowserError> {
        Ok(self.query_all(query)?.into_iter().next())
    }

    pub fn query_all(&self, query: &str) -> Result<Vec<Element>, BrowserError> {
        self.with_root(|root| select_in(root, query))
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Trimmed text content.
    pub fn text(&self) -> String {
        self.with_root(|root| root.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.with_root(|root| root.value().attr(name).map(String::from))
            .flatten()
    }
}

/// A browser tab: navigate it, then read elements from the current document.
#[async_trait::async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str, wait: WaitPolicy) -> Result<(), BrowserError>;
    async fn wait_for_selector(&self, query: &str) -> Result<Element, BrowserError>;
    async fn query(&self, query: &str) -> Result<Option<Element>, BrowserError>;
    async fn query_all(&self, query: &str) -> Result<Vec<Element>, BrowserError>;
    async fn scroll_by(&self, distance: u32) -> Result<ScrollMetrics, BrowserError>;
}

#[derive(Default)]
struct PageState {
    document: Option<String>,
    scroll_y: u32,
}

/// Page backed by fetched HTML. Nothing loads after the response body, so
/// the document has no scroll height and one scroll step reaches the bottom.
pub struct HtmlPage {
    fetcher: Arc<dyn Fetcher>,
    navigation_timeout: Option<Duration>,
    state: Mutex<PageState>,
}

impl HtmlPage {
    pub fn new(fetcher: Arc<dyn Fetcher>, navigation_timeout: Option<Duration>) -> Self {
        Self {
            fetcher,
            navigation_timeout,
            state: Mutex::new(PageState::default()),
        }
    }

    fn document(&self) -> Result<String, BrowserError> {
        let state = self.state.lock().map_err(|_| BrowserError::NoDocument)?;
        state.document.clone().ok_or(BrowserError::NoDocument)
    }

    fn select_document(&self, query: &str) -> Result<Vec<Element>, BrowserError> {
        let document = Html::parse_document(&self.document()?);
        select_in(document.root_element(), query)
    }
}

#[async_trait::async_trait]
impl Page for HtmlPage {
    async fn goto(&self, url: &str, wait: WaitPolicy) -> Result<(), BrowserError> {
        debug!(network_idle = wait.network_idle, dom_ready = wait.dom_ready, "Navigating to {}", url);
        let fetched = match self.navigation_timeout {
            Some(limit) => timeout(limit, self.fetcher.fetch(url))
                .await
                .unwrap_or(Err(ScraperError::Timeout(limit.as_secs()))),
            None => self.fetcher.fetch(url).await,
        };
        let html = fetched.map_err(|source| BrowserError::Navigation {
            url: url.to_string(),
            source,
        })?;

        let mut state = self.state.lock().map_err(|_| BrowserError::NoDocument)?;
        state.document = Some(html);
        state.scroll_y = 0;
        Ok(())
    }

    async fn wait_for_selector(&self, query: &str) -> Result<Element, BrowserError> {
        self.query(query)
            .await?
            .ok_or_else(|| BrowserError::SelectorNotFound(query.to_string()))
    }

    async fn query(&self, query: &str) -> Result<Option<Element>, BrowserError> {
        Ok(self.select_document(query)?.into_iter().next())
    }

    async fn query_all(&self, query: &str) -> Result<Vec<Element>, BrowserError> {
        self.select_document(query)
    }

    async fn scroll_by(&self, distance: u32) -> Result<ScrollMetrics, BrowserError> {
        let mut state = self.state.lock().map_err(|_| BrowserError::NoDocument)?;
        if state.document.is_none() {
            return Err(BrowserError::NoDocument);
        }
        state.scroll_y = state.scroll_y.saturating_add(distance);
        Ok(ScrollMetrics { position: state.scroll_y, height: 0 })
    }
}

/// Scrolls in fixed steps until the travelled distance reaches the page's
/// scroll height. The height is re-read after every step because lazy
/// listings grow while scrolling. Returns the number of steps taken.
pub async fn scroll_to_bottom<P: Page + ?Sized>(page: &P, settings: &ScrollConfig) -> Result<u32, BrowserError> {
    let distance = settings.distance.max(1);
    let mut travelled: u64 = 0;

    for step in 1..=settings.max_steps {
        let metrics = page.scroll_by(distance).await?;
        travelled += u64::from(distance);
        debug!("Scrolled to {} of {}", metrics.position, metrics.height);
        if travelled >= u64::from(metrics.height) {
            return Ok(step);
        }
        if settings.interval_ms > 0 {
            sleep(Duration::from_millis(settings.interval_ms)).await;
        }
    }

    warn!("Stopped scrolling after {} steps without reaching the bottom", settings.max_steps);
    Ok(settings.max_steps)
}
