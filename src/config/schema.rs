//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the job alert backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration (bind address, port).
    pub server: ServerConfig,

    /// Database settings.
    pub database: DatabaseConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Background scraping and email scheduling.
    pub scheduler: SchedulerConfig,

    /// Security hardening settings.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to listen on. Overridden by the `PORT` environment variable.
    pub port: u16,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., "sqlite:job_alerts.db").
    /// Overridden by the `DATABASE_URL` environment variable.
    pub url: String,

    /// Maximum pool connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:job_alerts.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Maximum requests per window per client address.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: 600,
            max_requests: 200,
        }
    }
}

/// Background scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Enable the background scheduler.
    pub enabled: bool,

    /// Delay between the listener coming up and the scheduler starting,
    /// in milliseconds. Keeps heavy scraping off the startup path so
    /// platform deploy probes see the server respond promptly.
    pub start_delay_ms: u64,

    /// Interval between scrape runs in seconds.
    pub scrape_interval_secs: u64,

    /// Job board sources to scrape.
    pub sources: Vec<SourceConfig>,

    /// Email digest settings.
    pub email: EmailConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_delay_ms: 8000,
            scrape_interval_secs: 3600,
            sources: Vec::new(),
            email: EmailConfig::default(),
        }
    }
}

/// A single job board source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Source identifier for logging and job attribution.
    pub name: String,

    /// Listing page URL.
    pub url: String,

    /// CSS selector matching one listing element per job.
    pub job_selector: String,

    /// CSS selector for the job title, relative to the listing element.
    pub title_selector: String,

    /// CSS selector for the company name, relative to the listing element.
    #[serde(default)]
    pub company_selector: Option<String>,

    /// CSS selector for the job link, relative to the listing element.
    /// Falls back to the listing element's own `href` when absent.
    #[serde(default)]
    pub link_selector: Option<String>,
}

/// Email digest settings.
///
/// Delivery goes through an HTTP mail API rather than raw SMTP; when no
/// endpoint is configured the digest loop logs what it would have sent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Enable email digests.
    pub enabled: bool,

    /// Mail API endpoint to POST digests to.
    pub api_endpoint: String,

    /// Bearer token for the mail API.
    /// Overridden by the `MAIL_API_KEY` environment variable.
    pub api_key: String,

    /// Sender address.
    pub from_address: String,

    /// Interval between digest runs in seconds.
    pub digest_interval_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_endpoint: String::new(),
            api_key: String::new(),
            from_address: "alerts@localhost".to_string(),
            digest_interval_secs: 86_400,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
