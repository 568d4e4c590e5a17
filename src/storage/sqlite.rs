use crate::model::{MatchRecord, StorageError};
use crate::storage::SinkKind;
use chrono::Utc;
use rusqlite::{params, Connection};

/// Machine-readable copy of every record written to the text sinks.
pub struct SqliteStorage {
    conn: Connection,
}

/// A stored record as read back from the database.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMatch {
    pub sink: String,
    pub teams: String,
    pub period: Option<i64>,
    pub minute: Option<i64>,
    pub total_minute: Option<i64>,
    pub period_goals: Option<i64>,
    pub coefs: Vec<crate::model::CoefficientEntry>,
}

impl SqliteStorage {
    /// Opens the database and creates the schema if needed
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open(db_path)?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS matches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sink TEXT NOT NULL,
                datetime TEXT NOT NULL,
                link TEXT NOT NULL,
                teams TEXT NOT NULL,
                period INTEGER,
                minute INTEGER,
                total_minute INTEGER,
                goals INTEGER,
                period_goals INTEGER,
                coefs TEXT NOT NULL DEFAULT '[]',
                recorded_at TEXT NOT NULL
            );
            "
        )?;

        Ok(Self { conn })
    }

    /// Unreadable values are stored as NULL.
    pub fn save_match(&self, sink: SinkKind, record: &MatchRecord) -> Result<(), StorageError> {
        let coefs = serde_json::to_string(&record.coefs)?;
        self.conn.execute(
            "INSERT INTO matches (
                sink, datetime, link, teams, period, minute, total_minute,
                goals, period_goals, coefs, recorded_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                sink.as_str(),
                &record.datetime,
                &record.link,
                &record.teams,
                record.period.value(),
                record.minute.value(),
                record.total_minute.value(),
                record.goals.value(),
                record.period_goals.value(),
                coefs,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn count_matches(&self, sink: SinkKind) -> Result<usize, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM matches WHERE sink = ?1",
            params![sink.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
impl SqliteStorage {
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Records of one sink in insertion order
    pub fn get_matches(&self, sink: SinkKind) -> Result<Vec<StoredMatch>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT sink, teams, period, minute, total_minute, period_goals, coefs
             FROM matches WHERE sink = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![sink.as_str()], |row| {
            Ok((
                StoredMatch {
                    sink: row.get(0)?,
                    teams: row.get(1)?,
                    period: row.get(2)?,
                    minute: row.get(3)?,
                    total_minute: row.get(4)?,
                    period_goals: row.get(5)?,
                    coefs: Vec::new(),
                },
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut matches = Vec::new();
        for row in rows {
            let (mut stored, coefs) = row?;
            stored.coefs = serde_json::from_str(&coefs)?;
            matches.push(stored);
        }

        Ok(matches)
    }
}
