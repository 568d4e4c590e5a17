// Fetcher serving fixed pages, for tests.
use crate::model::ScraperError;
use crate::scraper::Fetcher;

use std::collections::HashMap;
use std::sync::Mutex;

const LISTING: &str = r#"<html><body><div id="contentColumn">
    <a href="/live/ledni-hokej-sparta-kometa">
        <div class="a-sticker--score">1:1</div>
        <span>Sparta - Kometa</span><span>2. 35:12(1:0, 0:1)</span>
    </a>
    <a href="/live/ledni-hokej-plzen-brno">
        <div class="a-sticker--score">3:1</div>
        <span>Plzeň - Brno</span><span>2. 35:12(1:0, 2:1)</span>
    </a>
    <a href="/live/ledni-hokej-down">
        <span>Zlín - Vítkovice</span><span>1. 12:00(0:0)</span>
    </a>
    <a href="/live/ledni-hokej-overtime">
        <span>Hradec - Litvínov</span><span>4. 63:10(1:0, 0:1, 1:1, 0:0)</span>
    </a>
    <a href="/live/fotbal-ignored"><span>Not hockey</span><span>1. 10:00</span></a>
</div></body></html>"#;

const SPARTA_DETAIL: &str = r#"<html><body>
    <div class="eventTable">
        <div class="eventTableHeaderWrapper"><div class="name">Vítěz zápasu</div></div>
        <div class="tbodyEventTable"><div class="trEventTable"><div class="tdEventCells">
            <div><span class="name">Sparta</span><span class="value">1.70</span></div>
        </div></div></div>
    </div>
    <div class="eventTable">
        <div class="eventTableHeaderWrapper"><div class="name">Počet gólů ve 2. třetině</div></div>
        <div class="tbodyEventTable">
            <div class="trEventTable"><div class="tdEventCells">
                <div><span class="name">1.5</span></div>
                <div><span class="name">Méně</span><span class="value">1.95</span></div>
                <div><span class="name">Více</span><span class="value">1.85</span></div>
            </div></div>
        </div>
    </div>
</body></html>"#;

const PLZEN_DETAIL: &str = r#"<html><body>
    <div class="eventTable">
        <div class="eventTableHeaderWrapper"><div class="name">Počet gólů ve 2. třetině</div></div>
        <div class="tbodyEventTable"><div class="trEventTable"><div class="tdEventCells">
            <div><span class="name">Více</span><span class="value">1.40</span></div>
        </div></div></div>
    </div>
</body></html>"#;

/// Serves fixed pages and records every requested url.
pub struct FixtureFetcher {
    pages: HashMap<String, &'static str>,
    pub requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new(pages: &[(&str, &'static str)]) -> Self {
        Self {
            pages: pages.iter().map(|(url, html)| (url.to_string(), *html)).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .map(|html| html.to_string())
            .ok_or(ScraperError::InvalidResponse(404))
    }
}

pub fn hockey_pages() -> Vec<(&'static str, &'static str)> {
    vec![
        ("https://example.test/live", LISTING),
        ("https://example.test/live/ledni-hokej-sparta-kometa", SPARTA_DETAIL),
        ("https://example.test/live/ledni-hokej-plzen-brno", PLZEN_DETAIL),
    ]
}
