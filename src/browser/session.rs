use crate::browser::page::HtmlPage;
use crate::config::Viewport;
use crate::scraper::Fetcher;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Opens pages that share one fetcher.
pub struct Browser {
    fetcher: Arc<dyn Fetcher>,
}

impl Browser {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub fn new_page(&self, navigation_timeout: Option<Duration>) -> HtmlPage {
        HtmlPage::new(self.fetcher.clone(), navigation_timeout)
    }

    /// The two long-lived pages a cycle works with.
    pub fn new_session(&self, viewport: Viewport, navigation_timeout: Option<Duration>) -> Session<HtmlPage> {
        info!(
            "Opening browser session {}x{}, navigation timeout {:?}",
            viewport.width, viewport.height, navigation_timeout
        );
        Session {
            listing: self.new_page(navigation_timeout),
            detail: self.new_page(navigation_timeout),
        }
    }
}

/// Listing page and match detail page, reused across cycles.
pub struct Session<P> {
    pub listing: P,
    pub detail: P,
}
