//! Job board scraping.
//!
//! Each configured source is a listing page plus CSS selectors. Extraction
//! is a pure function over the fetched HTML so the parsed document never
//! crosses an await point (scraper's DOM is not Send).

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use scraper::{ElementRef, Html, Selector};
use sqlx::SqlitePool;
use url::Url;

use crate::config::SourceConfig;
use crate::db::{queries, Database, NewJob};
use crate::observability::metrics;
use crate::scheduler::SchedulerError;

/// A source with its URL and selectors parsed up front.
#[derive(Debug)]
pub struct CompiledSource {
    pub name: String,
    pub url: Url,
    pub job_selector: Selector,
    pub title_selector: Selector,
    pub company_selector: Option<Selector>,
    pub link_selector: Option<Selector>,
}

fn parse_selector(source: &str, selector: &str) -> Result<Selector, SchedulerError> {
    Selector::parse(selector).map_err(|e| SchedulerError::InvalidSelector {
        source_name: source.to_string(),
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Compile configured sources, failing on any bad URL or selector.
pub fn compile_sources(sources: &[SourceConfig]) -> Result<Vec<CompiledSource>, SchedulerError> {
    sources
        .iter()
        .map(|s| {
            Ok(CompiledSource {
                url: Url::parse(&s.url).map_err(|e| SchedulerError::InvalidSourceUrl {
                    source_name: s.name.clone(),
                    reason: e.to_string(),
                })?,
                job_selector: parse_selector(&s.name, &s.job_selector)?,
                title_selector: parse_selector(&s.name, &s.title_selector)?,
                company_selector: s
                    .company_selector
                    .as_deref()
                    .map(|sel| parse_selector(&s.name, sel))
                    .transpose()?,
                link_selector: s
                    .link_selector
                    .as_deref()
                    .map(|sel| parse_selector(&s.name, sel))
                    .transpose()?,
                name: s.name.clone(),
            })
        })
        .collect()
}

fn element_text(element: &ElementRef) -> Option<String> {
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract job postings from a listing page.
pub fn extract_jobs(html: &str, source: &CompiledSource) -> Vec<NewJob> {
    let document = Html::parse_document(html);
    let mut jobs = Vec::new();

    for listing in document.select(&source.job_selector) {
        let Some(title) = listing
            .select(&source.title_selector)
            .next()
            .and_then(|e| element_text(&e))
        else {
            continue;
        };

        let company = source
            .company_selector
            .as_ref()
            .and_then(|sel| listing.select(sel).next())
            .and_then(|e| element_text(&e))
            .unwrap_or_else(|| "Unknown".to_string());

        let href = match &source.link_selector {
            Some(sel) => listing
                .select(sel)
                .next()
                .and_then(|e| e.value().attr("href")),
            None => listing.value().attr("href"),
        };
        let Some(href) = href else { continue };

        // Relative links are resolved against the listing page URL.
        let Ok(url) = source.url.join(href) else {
            continue;
        };

        jobs.push(NewJob {
            title,
            company,
            url: url.to_string(),
            source: source.name.clone(),
        });
    }

    jobs
}

/// Fetch one source and insert anything new. Returns the insert count.
pub async fn scrape_source(
    client: &reqwest::Client,
    pool: &SqlitePool,
    source: &CompiledSource,
) -> Result<usize, SchedulerError> {
    let body = client
        .get(source.url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let jobs = extract_jobs(&body, source);

    let mut inserted = 0;
    for job in &jobs {
        if queries::insert_job(pool, job).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

/// Scrape all sources on an interval, forever.
///
/// Per-source failures are logged and skipped; this loop only returns to
/// the supervisor on conditions it cannot make progress from.
pub async fn scrape_loop(
    client: reqwest::Client,
    db: Arc<Database>,
    sources: Vec<CompiledSource>,
    interval: Duration,
) -> Result<(), SchedulerError> {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let Some(pool) = db.pool() else {
            tracing::debug!("Skipping scrape run, database not connected yet");
            continue;
        };

        for source in &sources {
            match scrape_source(&client, pool, source).await {
                Ok(inserted) => {
                    tracing::info!(source = %source.name, inserted, "Scrape completed");
                    metrics::record_jobs_scraped(&source.name, inserted as u64);
                }
                Err(e) => {
                    tracing::warn!(source = %source.name, error = %e, "Scrape failed");
                }
            }

            // Small jitter between sources to avoid hammering anything.
            let jitter = rand::thread_rng().gen_range(100..600);
            tokio::time::sleep(Duration::from_millis(jitter)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(link_selector: Option<&str>) -> CompiledSource {
        compile_sources(&[SourceConfig {
            name: "acme".to_string(),
            url: "https://jobs.acme.test/listings".to_string(),
            job_selector: ".job".to_string(),
            title_selector: ".title".to_string(),
            company_selector: Some(".company".to_string()),
            link_selector: link_selector.map(|s| s.to_string()),
        }])
        .unwrap()
        .remove(0)
    }

    const LISTING: &str = r#"
        <html><body>
          <div class="job">
            <span class="title">Backend Engineer</span>
            <span class="company">Acme</span>
            <a class="link" href="/jobs/42">details</a>
          </div>
          <div class="job">
            <span class="title">  </span>
            <a class="link" href="/jobs/43">details</a>
          </div>
          <div class="job">
            <span class="title">SRE</span>
            <a class="link" href="https://other.test/jobs/7">details</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn extracts_jobs_and_resolves_relative_links() {
        let jobs = extract_jobs(LISTING, &source(Some(".link")));

        // The empty-title listing is dropped.
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Backend Engineer");
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].url, "https://jobs.acme.test/jobs/42");
        assert_eq!(jobs[1].url, "https://other.test/jobs/7");
        assert_eq!(jobs[1].company, "Unknown");
    }

    #[test]
    fn listing_without_link_is_skipped() {
        let html = r#"<div class="job"><span class="title">No Link</span></div>"#;
        assert!(extract_jobs(html, &source(Some(".link"))).is_empty());
    }

    #[test]
    fn invalid_selector_fails_compilation() {
        let err = compile_sources(&[SourceConfig {
            name: "bad".to_string(),
            url: "https://jobs.acme.test".to_string(),
            job_selector: ":::".to_string(),
            title_selector: ".title".to_string(),
            company_selector: None,
            link_selector: None,
        }])
        .unwrap_err();

        assert!(matches!(err, SchedulerError::InvalidSelector { .. }));
    }
}
