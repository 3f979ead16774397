//! Background scheduler subsystem.
//!
//! # Data Flow
//! ```text
//! start_job_scraping()
//!     → validate config synchronously (sources, selectors, client)
//!     → spawn supervised scrape loop (scraper.rs)
//!     → spawn supervised digest loop (mailer.rs, when email enabled)
//! ```
//!
//! # Design Decisions
//! - All validation happens before anything is spawned, so a misconfigured
//!   scheduler fails synchronously and the caller can catch it
//! - Started at most once per process; there is no retry after a failed start
//! - The loops run under the supervisor: a failure is logged once and the
//!   rest of the service keeps running

pub mod mailer;
pub mod scraper;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::SchedulerConfig;
use crate::db::{Database, DbError};
use crate::lifecycle::spawn_supervised;
use crate::scheduler::scraper::compile_sources;

/// Scheduler error type.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler is disabled in configuration")]
    Disabled,

    #[error("scheduler already started")]
    AlreadyStarted,

    #[error("no job sources configured")]
    NoSources,

    #[error("source '{source_name}': invalid url: {reason}")]
    InvalidSourceUrl {
        source_name: String,
        reason: String,
    },

    #[error("source '{source_name}': invalid selector '{selector}': {reason}")]
    InvalidSelector {
        source_name: String,
        selector: String,
        reason: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Job scraping and email digest scheduler.
pub struct Scheduler {
    config: SchedulerConfig,
    db: Arc<Database>,
    started: Arc<AtomicBool>,
}

impl Scheduler {
    /// The `started` flag is shared with the HTTP status handler.
    pub fn new(config: SchedulerConfig, db: Arc<Database>, started: Arc<AtomicBool>) -> Self {
        Self {
            config,
            db,
            started,
        }
    }

    /// Validate configuration and spawn the background loops.
    ///
    /// Everything that can fail does so synchronously, before any task is
    /// spawned. Once the loops are running, their failures go to the
    /// supervisor log instead of this call's result.
    pub fn start_job_scraping(&self) -> Result<(), SchedulerError> {
        if !self.config.enabled {
            return Err(SchedulerError::Disabled);
        }
        if self.config.sources.is_empty() {
            return Err(SchedulerError::NoSources);
        }

        let sources = compile_sources(&self.config.sources)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("job-alert-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if self.started.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyStarted);
        }

        let source_count = sources.len();
        spawn_supervised(
            "job-scraper",
            scraper::scrape_loop(
                client.clone(),
                self.db.clone(),
                sources,
                Duration::from_secs(self.config.scrape_interval_secs),
            ),
        );

        if self.config.email.enabled {
            spawn_supervised(
                "email-digest",
                mailer::digest_loop(
                    client,
                    self.db.clone(),
                    self.config.email.clone(),
                    Duration::from_secs(self.config.email.digest_interval_secs),
                ),
            );
        }

        tracing::info!(
            sources = source_count,
            email = self.config.email.enabled,
            "Job scraping scheduler started"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;

    fn scheduler(config: SchedulerConfig) -> Scheduler {
        Scheduler::new(
            config,
            Arc::new(Database::new()),
            Arc::new(AtomicBool::new(false)),
        )
    }

    fn valid_source() -> SourceConfig {
        SourceConfig {
            name: "acme".to_string(),
            url: "https://jobs.acme.test/listings".to_string(),
            job_selector: ".job".to_string(),
            title_selector: ".title".to_string(),
            company_selector: None,
            link_selector: None,
        }
    }

    #[tokio::test]
    async fn start_without_sources_fails_synchronously() {
        let s = scheduler(SchedulerConfig::default());
        assert!(matches!(
            s.start_job_scraping(),
            Err(SchedulerError::NoSources)
        ));
        assert!(!s.started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn start_is_one_shot() {
        let mut config = SchedulerConfig::default();
        config.sources.push(valid_source());

        let s = scheduler(config);
        s.start_job_scraping().unwrap();
        assert!(s.started.load(Ordering::SeqCst));
        assert!(matches!(
            s.start_job_scraping(),
            Err(SchedulerError::AlreadyStarted)
        ));
    }

    #[tokio::test]
    async fn bad_selector_leaves_scheduler_unstarted() {
        let mut config = SchedulerConfig::default();
        let mut source = valid_source();
        source.job_selector = ":::".to_string();
        config.sources.push(source);

        let s = scheduler(config);
        assert!(matches!(
            s.start_job_scraping(),
            Err(SchedulerError::InvalidSelector { .. })
        ));
        assert!(!s.started.load(Ordering::SeqCst));
    }
}
