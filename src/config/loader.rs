//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration, apply environment overrides, and validate.
///
/// With no file path the built-in defaults are used, so the service runs
/// with nothing but a `PORT` variable, matching how it is deployed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = fs::read_to_string(p)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment variables take precedence over file values.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => tracing::warn!(value = %port, "Ignoring unparseable PORT variable"),
        }
    }
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }
    if let Ok(key) = std::env::var("MAIL_API_KEY") {
        config.scheduler.email.api_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests in this module mutate process environment; serialize them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn missing_port_variable_falls_back_to_5000() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("PORT");
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn port_variable_overrides_file_value() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 4000").unwrap();

        std::env::set_var("PORT", "9100");
        let config = load_config(Some(file.path())).unwrap();
        std::env::remove_var("PORT");

        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml ===").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/app.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
