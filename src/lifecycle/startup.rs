//! Startup orchestration.
//!
//! The bootstrap sequence runs once, linearly:
//! build shared state → fire-and-forget database connect → bind listener →
//! confirm startup on both channels → schedule the delayed scheduler start
//! → serve until shutdown.
//!
//! Two branches deliberately never join back into this flow: the database
//! connect task and the delayed scheduler start. Both run under the
//! supervisor so their failures surface as log entries, not crashes. The
//! only fatal startup error is failing to bind the listener.

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::db::Database;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::spawn_supervised;
use crate::observability::metrics;
use crate::scheduler::Scheduler;

/// Fatal bootstrap errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid bind address {addr}")]
    InvalidAddress { addr: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Run the service until shutdown.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let db = Arc::new(Database::new());
    let scheduler_started = Arc::new(AtomicBool::new(false));

    // Fire-and-forget: the API serves 503 from data endpoints until the
    // pool is published, and a connect failure lands in the supervisor log.
    {
        let db = db.clone();
        let db_config = config.database.clone();
        spawn_supervised("db-connect", async move { db.connect(&db_config).await });
    }

    let state = AppState {
        db: db.clone(),
        scheduler_started: scheduler_started.clone(),
    };
    let server = HttpServer::new(&config, state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|_| StartupError::InvalidAddress {
            addr: format!("{}:{}", config.server.host, config.server.port),
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    let local_addr = listener.local_addr()?;

    // Startup confirmation on both channels: the structured log and plain
    // stdout for platform deploy logs.
    tracing::info!(address = %local_addr, "Server running");
    println!("Live at: http://{local_addr}");

    if config.scheduler.enabled {
        schedule_delayed_start(&config, db, scheduler_started);
    } else {
        tracing::info!("Scheduler disabled in configuration");
    }

    server.run(listener).await?;
    Ok(())
}

/// Kick off the scheduler a fixed delay after the listener is up.
///
/// The delay keeps scraping and email work away from startup so deploy
/// probes see the server answer immediately. One-shot: the timer is not
/// cancellable and a failed start is never retried.
fn schedule_delayed_start(config: &AppConfig, db: Arc<Database>, started: Arc<AtomicBool>) {
    let scheduler = Scheduler::new(config.scheduler.clone(), db, started);
    let delay = Duration::from_millis(config.scheduler.start_delay_ms);

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match scheduler.start_job_scraping() {
            Ok(()) => {
                println!("Scraper & email scheduler started after server boot");
            }
            Err(e) => {
                eprintln!("Scheduler failed: {e}");
                tracing::error!(error = %e, "Scheduler failed to start");
            }
        }
    });
}
