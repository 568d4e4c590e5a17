pub mod sqlite;
pub mod text;

pub use sqlite::SqliteStorage;
pub use text::TextSink;

use crate::config::OutputConfig;
use crate::model::{MatchRecord, StorageError};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Every observed match.
    Total,
    /// Matches that passed the filter.
    Result,
}

impl SinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SinkKind::Total => "total",
            SinkKind::Result => "result",
        }
    }
}

/// The output destinations a cycle writes records to.
pub struct Sinks {
    total: TextSink,
    result: TextSink,
    database: Option<Arc<Mutex<SqliteStorage>>>,
}

impl Sinks {
    pub fn new(total: TextSink, result: TextSink) -> Self {
        Self { total, result, database: None }
    }

    pub fn with_database(mut self, storage: SqliteStorage) -> Self {
        self.database = Some(Arc::new(Mutex::new(storage)));
        self
    }

    pub fn from_config(output: &OutputConfig) -> Result<Self, StorageError> {
        let sinks = Self::new(TextSink::new(&output.total), TextSink::new(&output.result));
        match &output.database {
            Some(path) => Ok(sinks.with_database(SqliteStorage::new(path)?)),
            None => Ok(sinks),
        }
    }

    pub fn database(&self) -> Option<Arc<Mutex<SqliteStorage>>> {
        self.database.clone()
    }

    pub async fn write(&self, kind: SinkKind, record: &MatchRecord) -> Result<(), StorageError> {
        let sink = match kind {
            SinkKind::Total => &self.total,
            SinkKind::Result => &self.result,
        };
        sink.append(record).await?;

        if let Some(storage) = &self.database {
            storage.lock().await.save_match(kind, record)?;
        }
        Ok(())
    }
}
