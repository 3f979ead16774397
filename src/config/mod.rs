//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file → process environment (dotenv, loaded in main)
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → read once at startup, never mutated afterwards
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the service runs with no config file at all
//! - `PORT` from the environment wins over any configured port
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, DatabaseConfig, EmailConfig, ObservabilityConfig, RateLimitConfig, SchedulerConfig,
    SecurityConfig, ServerConfig, SourceConfig,
};
