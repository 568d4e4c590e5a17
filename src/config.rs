use serde::Deserialize;
use std::fs;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Filter thresholds, the `data` block of the config file.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Thresholds {
    pub period: i64,
    pub minute: i64,
    /// Inclusive ceiling on goals scored in the current period.
    pub goals: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1920, height: 980 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub distance: u32,
    pub interval_ms: u64,
    pub max_steps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { distance: 100, interval_ms: 100, max_steps: 500 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub total: String,
    pub result: String,
    pub database: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            total: "total.txt".into(),
            result: "result.txt".into(),
            database: None,
        }
    }
}

/// DOM selectors for the listing and match detail markup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub content: String,
    pub match_item: String,
    pub score: String,
    pub info: String,
    pub event_table: String,
    pub event_table_header: String,
    pub event_table_name: String,
    pub event_table_body: String,
    pub event_table_row: String,
    pub event_table_cells: String,
    pub event_table_cell_name: String,
    pub event_table_cell_value: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            content: "div#contentColumn".into(),
            match_item: r#"a[href*="/live/ledni-hokej-"]"#.into(),
            score: "div.a-sticker--score".into(),
            info: "span".into(),
            event_table: "div.eventTable".into(),
            event_table_header: "div.eventTableHeaderWrapper".into(),
            event_table_name: "div.name".into(),
            event_table_body: "div.eventTableHeaderWrapper + div.tbodyEventTable".into(),
            event_table_row: "div.trEventTable".into(),
            event_table_cells: "div.tdEventCells > div".into(),
            event_table_cell_name: "span.name".into(),
            event_table_cell_value: "span.value".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub parse_url: String,
    pub home_url: String,
    pub data: Thresholds,
    /// Zero disables the navigation ceiling.
    #[serde(default)]
    pub navigation_timeout_seconds: u64,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: Selectors,
}

impl AppConfig {
    pub fn navigation_timeout(&self) -> Option<Duration> {
        match self.navigation_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.parse_url.trim().is_empty() {
            return Err(ConfigError::Invalid("parse_url is empty".into()));
        }
        if self.home_url.trim().is_empty() {
            return Err(ConfigError::Invalid("home_url is empty".into()));
        }
        if self.scroll.distance == 0 {
            return Err(ConfigError::Invalid("scroll.distance must be positive".into()));
        }
        Ok(self)
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "parse_url": "https://example.test/live",
        "home_url": "https://example.test",
        "data": { "period": 2, "minute": 15, "goals": 1 }
    }"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = parse_config(MINIMAL).unwrap();
        assert_eq!(cfg.data, Thresholds { period: 2, minute: 15, goals: 1 });
        assert_eq!(cfg.navigation_timeout(), None);
        assert_eq!(cfg.viewport, Viewport { width: 1920, height: 980 });
        assert_eq!(cfg.scroll.distance, 100);
        assert_eq!(cfg.output.total, "total.txt");
        assert_eq!(cfg.selectors.score, "div.a-sticker--score");
    }

    #[test]
    fn example_config_targets_default_markup() {
        let cfg = parse_config(include_str!("../config.example.json")).unwrap();
        assert!(cfg.parse_url.starts_with(&cfg.home_url));
        assert!(cfg.home_url.contains("tipsport.cz"));
        assert_eq!(cfg.selectors.content, Selectors::default().content);
        assert_eq!(cfg.navigation_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(cfg.output.database.as_deref(), Some("matches.db"));
    }

    #[test]
    fn wrong_threshold_type_is_rejected() {
        let raw = MINIMAL.replace(r#""goals": 1"#, r#""goals": "one""#);
        assert!(matches!(parse_config(&raw), Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_data_block_is_rejected() {
        let raw = r#"{ "parse_url": "a", "home_url": "b" }"#;
        assert!(matches!(parse_config(raw), Err(ConfigError::Json(_))));
    }

    #[test]
    fn empty_url_is_invalid() {
        let raw = MINIMAL.replace("https://example.test/live", " ");
        assert!(matches!(parse_config(&raw), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn navigation_ceiling_is_opt_in() {
        let raw = MINIMAL.replace("\"data\"", "\"navigation_timeout_seconds\": 30, \"data\"");
        let cfg = parse_config(&raw).unwrap();
        assert_eq!(cfg.navigation_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_config("/nonexistent/config.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
