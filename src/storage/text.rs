use crate::model::{MatchRecord, StorageError};
use crate::utils::capitalize;

use std::path::PathBuf;
#[cfg(test)]
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Human-readable block: one `Label: value` line per field, one
/// `name: value` line per coefficient, then a blank line.
pub fn format_record(record: &MatchRecord) -> String {
    let fields = [
        ("datetime", record.datetime.clone()),
        ("link", record.link.clone()),
        ("teams", record.teams.clone()),
        ("period", record.period.to_string()),
        ("minute", record.minute.to_string()),
        ("goals", record.goals.to_string()),
        ("periodGoals", record.period_goals.to_string()),
    ];

    let mut block = String::new();
    for (name, value) in fields {
        block.push_str(&format!("{}: {}\n", capitalize(name), value));
    }
    for coef in &record.coefs {
        block.push_str(&format!("{}: {}\n", coef.name, coef.value));
    }
    block.push('\n');
    block
}

/// Append-only text file.
pub struct TextSink {
    path: PathBuf,
}

impl TextSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &MatchRecord) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format_record(record).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
