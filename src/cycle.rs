use crate::browser::{scroll_to_bottom, Element, Page, Session, WaitPolicy};
use crate::config::{AppConfig, Selectors};
use crate::filter::is_fit;
use crate::model::{BrowserError, CoefficientEntry, CycleError, MatchError, Reading};
use crate::parser::{extract_coefficients, parse_time, table_label_for_period, CoefficientCell, CoefficientTable};
use crate::record::{build_record, ListingSnapshot};
use crate::storage::{SinkKind, Sinks};
use crate::utils::{absolute_link, now_datetime};
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub found: usize,
    pub written: usize,
    pub fit: usize,
    pub failed: usize,
}

/// One pass over the live listing.
pub struct ScrapeCycle<'a, P: Page> {
    session: &'a Session<P>,
    config: &'a AppConfig,
    sinks: &'a Sinks,
}

impl<'a, P: Page> ScrapeCycle<'a, P> {
    pub fn new(session: &'a Session<P>, config: &'a AppConfig, sinks: &'a Sinks) -> Self {
        Self { session, config, sinks }
    }

    /// Matches are processed one at a time. A failing match is logged and
    /// skipped; only a listing page failure aborts the cycle.
    pub async fn run(&self) -> Result<CycleReport, CycleError> {
        let listing = &self.session.listing;
        let selectors = &self.config.selectors;

        listing.goto(&self.config.parse_url, WaitPolicy::SETTLED).await?;
        scroll_to_bottom(listing, &self.config.scroll).await?;
        let content = listing.wait_for_selector(&selectors.content).await?;
        let entries = content.query_all(&selectors.match_item)?;
        info!("Found total {} matches", entries.len());

        let mut report = CycleReport { found: entries.len(), ..CycleReport::default() };
        for (index, entry) in entries.iter().enumerate() {
            match self.process_match(entry).await {
                Ok(fit) => {
                    report.written += 1;
                    if fit {
                        report.fit += 1;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("Skipping match #{}: {}", index + 1, e);
                }
            }
        }

        Ok(report)
    }

    async fn process_match(&self, entry: &Element) -> Result<bool, MatchError> {
        let snapshot = read_listing_entry(entry, &self.config.selectors)?;
        let period = parse_time(&snapshot.timings).period;
        let coefs = self.fetch_coefficients(&snapshot.href, period).await?;
        let record = build_record(&snapshot, &self.config.home_url, coefs, now_datetime());

        if let Ok(payload) = serde_json::to_string(&record) {
            debug!("{}", payload);
        }
        self.sinks.write(SinkKind::Total, &record).await?;

        let fit = is_fit(&record, &self.config.data);
        if fit {
            info!(
                teams = %record.teams,
                period = %record.period,
                minute = %record.minute,
                total_minute = %record.total_minute,
                score = snapshot.score.as_deref().unwrap_or("0:0"),
                "Found fit match"
            );
            self.sinks.write(SinkKind::Result, &record).await?;
        }
        Ok(fit)
    }

    /// Coefficients from the detail page table for the current period. No
    /// navigation happens when the period has no table.
    async fn fetch_coefficients(&self, href: &str, period: Reading) -> Result<Vec<CoefficientEntry>, BrowserError> {
        let Some(label) = table_label_for_period(period) else {
            return Ok(Vec::new());
        };

        let detail = &self.session.detail;
        detail.goto(&absolute_link(&self.config.home_url, href), WaitPolicy::SETTLED).await?;
        scroll_to_bottom(detail, &self.config.scroll).await?;

        let selectors = &self.config.selectors;
        let mut tables = Vec::new();
        for table in detail.query_all(&selectors.event_table).await? {
            tables.push(read_table(&table, selectors, label)?);
        }

        let coefs = extract_coefficients(&tables, label);
        debug!("{} coefficients from '{}'", coefs.len(), label);
        Ok(coefs)
    }
}

fn read_listing_entry(entry: &Element, selectors: &Selectors) -> Result<ListingSnapshot, BrowserError> {
    let score = entry.query(&selectors.score)?.map(|badge| badge.text());
    let mut info = entry.query_all(&selectors.info)?.into_iter().map(|span| span.text());
    let teams = info
        .next()
        .ok_or_else(|| BrowserError::SelectorNotFound(selectors.info.clone()))?;
    let timings = info.next().unwrap_or_default();
    let href = entry
        .attr("href")
        .ok_or_else(|| BrowserError::MissingAttribute("href".into()))?;

    Ok(ListingSnapshot { score, teams, timings, href })
}

/// Reads a table header, and its cells only when the header is `label`.
fn read_table(table: &Element, selectors: &Selectors, label: &str) -> Result<CoefficientTable, BrowserError> {
    let header = match table.query(&selectors.event_table_header)? {
        Some(header) => header
            .query(&selectors.event_table_name)?
            .map(|name| name.text())
            .unwrap_or_default(),
        None => String::new(),
    };
    if header != label {
        return Ok(CoefficientTable { header, rows: Vec::new() });
    }

    let mut rows = Vec::new();
    if let Some(body) = table.query(&selectors.event_table_body)? {
        for row in body.query_all(&selectors.event_table_row)? {
            let mut cells = Vec::new();
            for cell in row.query_all(&selectors.event_table_cells)? {
                cells.push(CoefficientCell {
                    name: cell.query(&selectors.event_table_cell_name)?.map(|n| n.text()),
                    value: cell.query(&selectors.event_table_cell_value)?.map(|v| v.text()),
                });
            }
            rows.push(cells);
        }
    }

    Ok(CoefficientTable { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Browser;
    use crate::browser::HtmlPage;
    use crate::config::parse_config;
    use crate::scraper::fixture::{hockey_pages, FixtureFetcher};
    use crate::storage::{SqliteStorage, TextSink};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("period-sniper-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn config() -> AppConfig {
        parse_config(
            r#"{
                "parse_url": "https://example.test/live",
                "home_url": "https://example.test",
                "data": { "period": 2, "minute": 15, "goals": 1 },
                "scroll": { "distance": 500, "interval_ms": 0 }
            }"#,
        )
        .unwrap()
    }

    fn session(fetcher: Arc<FixtureFetcher>, cfg: &AppConfig) -> Session<HtmlPage> {
        Browser::new(fetcher).new_session(cfg.viewport, cfg.navigation_timeout())
    }

    #[tokio::test]
    async fn writes_every_match_to_total_and_fit_ones_to_result() {
        let dir = temp_dir("cycle");
        let cfg = config();
        let fetcher = Arc::new(FixtureFetcher::new(&hockey_pages()));
        let session = session(fetcher.clone(), &cfg);
        let sinks = Sinks::new(TextSink::new(dir.join("total.txt")), TextSink::new(dir.join("result.txt")))
            .with_database(SqliteStorage::in_memory().unwrap());

        let report = ScrapeCycle::new(&session, &cfg, &sinks).run().await.unwrap();

        assert_eq!(report, CycleReport { found: 4, written: 3, fit: 1, failed: 1 });

        let total = std::fs::read_to_string(dir.join("total.txt")).unwrap();
        assert!(total.contains("Teams: Sparta - Kometa\nPeriod: 2\nMinute: 15\nGoals: 2\nPeriodGoals: 1\nMéně: 1.95\nVíce: 1.85\n\n"));
        assert!(total.contains("Teams: Plzeň - Brno\nPeriod: 2\nMinute: 15\nGoals: 4\nPeriodGoals: 3\nVíce: 1.40\n\n"));
        assert!(total.contains("Teams: Hradec - Litvínov\nPeriod: 4\nMinute: 3\n"));
        assert!(!total.contains("Zlín"));
        assert!(!total.contains("Not hockey"));

        let result = std::fs::read_to_string(dir.join("result.txt")).unwrap();
        assert!(result.contains("Link: https://example.test/live/ledni-hokej-sparta-kometa\n"));
        assert!(!result.contains("Plzeň"));
        assert_eq!(result.matches("Datetime: ").count(), 1);

        let db = sinks.database().unwrap();
        let db = db.lock().await;
        assert_eq!(db.count_matches(SinkKind::Total).unwrap(), 3);
        let fit = db.get_matches(SinkKind::Result).unwrap();
        assert_eq!(fit.len(), 1);
        assert_eq!(fit[0].coefs.len(), 2);

        // Overtime has no coefficient table, so its detail page is never opened.
        let requests = fetcher.requests.lock().unwrap();
        assert!(!requests.iter().any(|url| url.ends_with("overtime")));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn listing_failure_aborts_cycle() {
        let dir = temp_dir("cycle-down");
        let cfg = config();
        let fetcher = Arc::new(FixtureFetcher::new(&[]));
        let session = session(fetcher, &cfg);
        let sinks = Sinks::new(TextSink::new(dir.join("total.txt")), TextSink::new(dir.join("result.txt")));

        let err = ScrapeCycle::new(&session, &cfg, &sinks).run().await.unwrap_err();
        assert!(matches!(err, CycleError::Listing(BrowserError::Navigation { .. })));
        assert!(!dir.join("total.txt").exists());
    }

    #[tokio::test]
    async fn missing_content_root_aborts_cycle() {
        let dir = temp_dir("cycle-empty");
        let cfg = config();
        let fetcher = Arc::new(FixtureFetcher::new(&[("https://example.test/live", "<html><body></body></html>")]));
        let session = session(fetcher, &cfg);
        let sinks = Sinks::new(TextSink::new(dir.join("total.txt")), TextSink::new(dir.join("result.txt")));

        let err = ScrapeCycle::new(&session, &cfg, &sinks).run().await.unwrap_err();
        assert!(matches!(err, CycleError::Listing(BrowserError::SelectorNotFound(_))));
    }

    #[test]
    fn entry_without_spans_is_rejected() {
        let entry = Element::from_html(r#"<a href="/live/x"><div class="a-sticker--score">1:0</div></a>"#);
        assert!(matches!(
            read_listing_entry(&entry, &Selectors::default()),
            Err(BrowserError::SelectorNotFound(_))
        ));
    }

    #[test]
    fn entry_without_timing_reads_empty() {
        let entry = Element::from_html(r#"<a href="/live/x"><span>A - B</span></a>"#);
        let snapshot = read_listing_entry(&entry, &Selectors::default()).unwrap();
        assert_eq!(snapshot.score, None);
        assert_eq!(snapshot.teams, "A - B");
        assert_eq!(snapshot.timings, "");
        assert_eq!(snapshot.href, "/live/x");
    }
}
