use crate::browser::{Browser, HtmlPage, Session};
use crate::config::{load_config, AppConfig, ConfigError};
use crate::cycle::{CycleReport, ScrapeCycle};
use crate::guard::{Phase, RunGuard};
use crate::model::{CycleError, StorageError};
use crate::scraper::Fetcher;
use crate::storage::{SinkKind, Sinks};

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot open output: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error("reload requested before a successful load")]
    NotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped,
    Completed(Phase, CycleReport),
    Failed(Phase),
}

/// Everything loading sets up once and reloading reuses.
struct Context {
    config: AppConfig,
    session: Session<HtmlPage>,
    sinks: Sinks,
}

pub struct Runner {
    config_path: String,
    fetcher: Arc<dyn Fetcher>,
    guard: RunGuard,
    context: OnceCell<Context>,
}

impl Runner {
    pub fn new(config_path: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config_path: config_path.into(),
            fetcher,
            guard: RunGuard::new(),
            context: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub fn guard(&self) -> &RunGuard {
        &self.guard
    }

    /// One timer tick: skip, load or reload.
    pub async fn tick(&self) -> TickOutcome {
        let Some(ticket) = self.guard.try_begin() else {
            info!(phase = ?self.guard.phase(), "Previous cycle still running, skipping tick");
            return TickOutcome::Skipped;
        };

        let phase = ticket.phase();
        let result = match phase {
            Phase::Loading => {
                info!("Parser started");
                self.load().await
            }
            _ => {
                info!("Parser reload");
                self.reload().await
            }
        };

        match result {
            Ok(report) => {
                info!(
                    "Cycle done: {} found, {} written, {} fit, {} failed",
                    report.found, report.written, report.fit, report.failed
                );
                ticket.complete();
                info!(launched = self.guard.launched(), "Parser ready for the next tick");
                TickOutcome::Completed(phase, report)
            }
            Err(e) => {
                error!("Cycle failed: {}", e);
                TickOutcome::Failed(phase)
            }
        }
    }

    async fn load(&self) -> Result<CycleReport, RunError> {
        let context = self.context.get_or_try_init(|| self.setup()).await?;
        self.run_cycle(context).await
    }

    async fn reload(&self) -> Result<CycleReport, RunError> {
        let context = self.context.get().ok_or(RunError::NotLoaded)?;
        self.run_cycle(context).await
    }

    async fn setup(&self) -> Result<Context, RunError> {
        let config = load_config(&self.config_path)?;
        info!("Loaded config from {}", self.config_path);
        let sinks = Sinks::from_config(&config.output)?;
        let session = Browser::new(self.fetcher.clone())
            .new_session(config.viewport, config.navigation_timeout());
        Ok(Context { config, session, sinks })
    }

    async fn run_cycle(&self, context: &Context) -> Result<CycleReport, RunError> {
        let report = ScrapeCycle::new(&context.session, &context.config, &context.sinks)
            .run()
            .await?;

        if let Some(storage) = context.sinks.database() {
            let counted = storage.lock().await.count_matches(SinkKind::Result);
            match counted {
                Ok(count) => info!("Database holds {} fit records", count),
                Err(e) => warn!("Database count failed: {:?}", e),
            }
        }
        Ok(report)
    }
}

/// Ticks once immediately, then every minute. Each tick runs on its own
/// task so the timer keeps firing while a cycle is in flight.
pub async fn run_forever(runner: Arc<Runner>) {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let runner = runner.clone();
        tokio::spawn(async move {
            runner.tick().await;
        });
    }
}
