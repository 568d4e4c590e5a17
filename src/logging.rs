// Console output plus one append-only log file per calendar day.
use crate::utils::today;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{EitherWriter, MakeWriter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_DIR: &str = "logs";

/// Opens `log-YYYY-MM-DD.log` for every event, so the file rolls over at
/// local midnight without a restart.
#[derive(Debug, Clone)]
pub struct DailyFile {
    dir: PathBuf,
}

impl DailyFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, date: &str) -> PathBuf {
        self.dir.join(format!("log-{}.log", date))
    }
}

impl<'a> MakeWriter<'a> for DailyFile {
    type Writer = EitherWriter<File, io::Sink>;

    fn make_writer(&'a self) -> Self::Writer {
        match OpenOptions::new().create(true).append(true).open(self.path_for(&today())) {
            Ok(file) => EitherWriter::A(file),
            Err(_) => EitherWriter::B(io::sink()),
        }
    }
}

pub fn init(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(DailyFile::new(dir)))
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn appends_to_todays_file() {
        let dir = std::env::temp_dir().join(format!("period-sniper-logs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let daily = DailyFile::new(&dir);
        let path = daily.path_for(&today());
        let _ = fs::remove_file(&path);

        daily.make_writer().write_all(b"Parser started\n").unwrap();
        daily.make_writer().write_all(b"Parser reload\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Parser started\nParser reload\n");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn unwritable_directory_is_discarded() {
        let daily = DailyFile::new("/nonexistent/period-sniper/logs");
        assert!(daily.make_writer().write_all(b"lost\n").is_ok());
    }
}
