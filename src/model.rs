// Core structs: Reading, MatchTime, MatchRecord and the error types
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A numeric value read from loosely structured page text.
///
/// `Absent` means the text had nothing to read, `Malformed` means there was
/// something but it did not convert to a number. Neither ever equals a
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reading {
    Value(i64),
    Absent,
    Malformed,
}

impl Reading {
    pub fn value(self) -> Option<i64> {
        match self {
            Reading::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Parses a trimmed integer; empty text is `Malformed`, not zero.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(v) => Reading::Value(v),
            Err(_) => Reading::Malformed,
        }
    }

    /// Combines two readings, `Absent` winning over `Malformed`. A combination
    /// that yields `None` (overflow) is `Malformed`.
    pub fn zip_with(self, other: Reading, f: impl FnOnce(i64, i64) -> Option<i64>) -> Reading {
        match (self, other) {
            (Reading::Value(a), Reading::Value(b)) => f(a, b).map_or(Reading::Malformed, Reading::Value),
            (Reading::Absent, _) | (_, Reading::Absent) => Reading::Absent,
            _ => Reading::Malformed,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => write!(f, "{}", v),
            Reading::Absent => f.write_str("null"),
            Reading::Malformed => f.write_str("NaN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTime {
    pub period: Reading,
    pub total_minute: Reading,
    pub period_minute: Reading,
}

impl MatchTime {
    pub const ABSENT: MatchTime = MatchTime {
        period: Reading::Absent,
        total_minute: Reading::Absent,
        period_minute: Reading::Absent,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    pub name: String,
    pub value: String,
}

/// One observed match snapshot. Built once per match per cycle.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub datetime: String,
    pub link: String,
    pub teams: String,
    pub period: Reading,
    /// Minute within the current period.
    pub minute: Reading,
    pub total_minute: Reading,
    /// Sum of the current score.
    pub goals: Reading,
    pub period_goals: Reading,
    pub coefs: Vec<CoefficientEntry>,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("invalid response status {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: ScraperError,
    },
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("element has no {0} attribute")]
    MissingAttribute(String),
    #[error("invalid selector {0:?}")]
    InvalidSelector(String),
    #[error("page has no document loaded")]
    NoDocument,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Browser(#[from] BrowserError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("listing page: {0}")]
    Listing(#[from] BrowserError),
}
