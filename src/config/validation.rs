//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! All errors are collected and reported together rather than failing on
//! the first one.

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("rate_limit.max_requests must be greater than zero")]
    ZeroMaxRequests,

    #[error("rate_limit.window_secs must be greater than zero")]
    ZeroWindow,

    #[error("database.url must not be empty")]
    EmptyDatabaseUrl,

    #[error("database.max_connections must be greater than zero")]
    ZeroPoolSize,

    #[error("scheduler source '{name}' has an invalid url: {reason}")]
    InvalidSourceUrl { name: String, reason: String },

    #[error("scheduler source at index {index} has an empty name")]
    UnnamedSource { index: usize },

    #[error("scheduler.scrape_interval_secs must be greater than zero")]
    ZeroScrapeInterval,

    #[error("scheduler.email.digest_interval_secs must be greater than zero")]
    ZeroDigestInterval,
}

/// Validate a parsed configuration.
///
/// Returns all problems found, not just the first.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::ZeroMaxRequests);
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::ZeroWindow);
        }
    }

    if config.database.url.is_empty() {
        errors.push(ValidationError::EmptyDatabaseUrl);
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    for (index, source) in config.scheduler.sources.iter().enumerate() {
        if source.name.is_empty() {
            errors.push(ValidationError::UnnamedSource { index });
        }
        if let Err(e) = Url::parse(&source.url) {
            errors.push(ValidationError::InvalidSourceUrl {
                name: source.name.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.scheduler.enabled {
        if config.scheduler.scrape_interval_secs == 0 {
            errors.push(ValidationError::ZeroScrapeInterval);
        }
        if config.scheduler.email.enabled && config.scheduler.email.digest_interval_secs == 0 {
            errors.push(ValidationError::ZeroDigestInterval);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SourceConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = AppConfig::default();
        config.rate_limit.max_requests = 0;
        config.database.url = String::new();
        config.scheduler.scrape_interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn zero_intervals_are_rejected_while_scheduling_is_on() {
        let mut config = AppConfig::default();
        config.scheduler.scrape_interval_secs = 0;
        config.scheduler.email.enabled = true;
        config.scheduler.email.digest_interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ZeroScrapeInterval)));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ZeroDigestInterval)));
    }

    #[test]
    fn disabled_scheduler_skips_interval_checks() {
        let mut config = AppConfig::default();
        config.scheduler.enabled = false;
        config.scheduler.scrape_interval_secs = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn email_without_an_endpoint_is_valid_log_only_mode() {
        let mut config = AppConfig::default();
        config.scheduler.email.enabled = true;
        config.scheduler.email.api_endpoint = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_unparseable_source_url() {
        let mut config = AppConfig::default();
        config.scheduler.sources.push(SourceConfig {
            name: "bad".to_string(),
            url: "not a url".to_string(),
            job_selector: ".job".to_string(),
            title_selector: ".title".to_string(),
            company_selector: None,
            link_selector: None,
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidSourceUrl { .. }
        ));
    }

    #[test]
    fn disabled_rate_limit_skips_limit_checks() {
        let mut config = AppConfig::default();
        config.rate_limit.enabled = false;
        config.rate_limit.max_requests = 0;
        assert!(validate_config(&config).is_ok());
    }
}
