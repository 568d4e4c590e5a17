mod browser;
mod config;
mod cycle;
mod filter;
mod guard;
mod logging;
mod model;
mod parser;
mod record;
mod runner;
mod scraper;
mod storage;
mod utils;

use runner::Runner;
use crate::scraper::HttpFetcher;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging: console plus daily files
    if let Err(e) = logging::init(Path::new(logging::LOG_DIR)) {
        tracing_subscriber::fmt::init();
        error!("File logging unavailable: {}", e);
    }

    // Log panics through tracing so they reach the log files too
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());

    let fetcher = match HttpFetcher::new() {
        Ok(f) => Arc::new(f),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };

    info!("Watching live matches with config {}", config_path);
    let runner = Arc::new(Runner::new(config_path, fetcher));
    runner::run_forever(runner).await;
}
