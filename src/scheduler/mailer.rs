//! Email digest delivery.
//!
//! Digests go out through an HTTP mail API (JSON POST with a bearer key)
//! rather than raw SMTP. Each active subscriber receives the jobs matching
//! their keywords that arrived since the previous run. With no endpoint
//! configured the composed digest is logged instead of delivered.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::config::EmailConfig;
use crate::db::{queries, Database, Job, Subscriber};
use crate::observability::metrics;
use crate::scheduler::SchedulerError;

// Upper bound on jobs considered per digest run.
const DIGEST_WINDOW: i64 = 100;

/// Payload POSTed to the mail API.
#[derive(Debug, Serialize)]
pub struct DigestEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
}

/// Jobs relevant to a subscriber: any keyword hit against title or company.
/// A subscriber with no keywords gets everything.
pub fn matching_jobs<'a>(subscriber: &Subscriber, jobs: &'a [Job]) -> Vec<&'a Job> {
    let keywords = subscriber.keyword_list();
    if keywords.is_empty() {
        return jobs.iter().collect();
    }

    jobs.iter()
        .filter(|job| {
            let haystack = format!("{} {}", job.title, job.company).to_lowercase();
            keywords.iter().any(|kw| haystack.contains(kw))
        })
        .collect()
}

/// Compose the digest for one subscriber.
pub fn build_digest(config: &EmailConfig, subscriber: &Subscriber, jobs: &[&Job]) -> DigestEmail {
    let mut text = format!("{} new job(s) matched your alerts:\n\n", jobs.len());
    for job in jobs {
        text.push_str(&format!("- {} at {}\n  {}\n", job.title, job.company, job.url));
    }

    DigestEmail {
        to: subscriber.email.clone(),
        from: config.from_address.clone(),
        subject: format!("Job alerts: {} new match(es)", jobs.len()),
        text,
    }
}

async fn send_digest(
    client: &reqwest::Client,
    config: &EmailConfig,
    email: &DigestEmail,
) -> Result<(), reqwest::Error> {
    client
        .post(&config.api_endpoint)
        .bearer_auth(&config.api_key)
        .json(email)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// One digest pass: gather jobs posted since `cutoff` and send each active
/// subscriber their matches. Returns the number of digests composed.
///
/// Delivery failures are per-subscriber warnings; only database errors
/// bubble up, and the caller treats those as a skipped run, not a fatal one.
pub(crate) async fn run_digest_tick(
    client: &reqwest::Client,
    pool: &SqlitePool,
    config: &EmailConfig,
    cutoff: i64,
) -> Result<usize, SchedulerError> {
    let recent = queries::recent_jobs(pool, None, DIGEST_WINDOW).await?;
    let new_jobs: Vec<Job> = recent
        .into_iter()
        .filter(|job| job.posted_at >= cutoff)
        .collect();
    if new_jobs.is_empty() {
        return Ok(0);
    }

    let mut composed = 0;
    for subscriber in queries::active_subscribers(pool).await? {
        let matches = matching_jobs(&subscriber, &new_jobs);
        if matches.is_empty() {
            continue;
        }

        let email = build_digest(config, &subscriber, &matches);
        composed += 1;

        if config.api_endpoint.is_empty() {
            tracing::info!(
                to = %email.to,
                subject = %email.subject,
                "Mail API not configured; digest logged only"
            );
            continue;
        }

        match send_digest(client, config, &email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, jobs = matches.len(), "Digest sent");
                metrics::record_digest_sent();
            }
            Err(e) => {
                tracing::warn!(to = %email.to, error = %e, "Digest delivery failed");
            }
        }
    }

    Ok(composed)
}

/// Periodically send digests to all active subscribers, forever.
///
/// A failed run is logged and skipped, never fatal: the cutoff stays put so
/// the affected jobs are picked up again on the next interval.
pub async fn digest_loop(
    client: reqwest::Client,
    db: Arc<Database>,
    config: EmailConfig,
    interval: Duration,
) -> Result<(), SchedulerError> {
    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; skip it so the first digest covers
    // a full interval of scraped jobs.
    ticker.tick().await;

    let mut last_run = Utc::now().timestamp_millis();

    loop {
        ticker.tick().await;

        let Some(pool) = db.pool() else {
            tracing::debug!("Skipping digest run, database not connected yet");
            continue;
        };

        let now = Utc::now().timestamp_millis();
        match run_digest_tick(&client, pool, &config, last_run).await {
            Ok(composed) => {
                last_run = now;
                if composed > 0 {
                    tracing::debug!(composed, "Digest run completed");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Digest run failed; retrying next interval");
            }
        }
    }
}
