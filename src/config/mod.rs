//! Configuration management for typedfile
//!
//! Settings are layered:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use typedfile::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Engine provider: {:?}", config.engine.provider);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `TYPEDFILE__<section>__<key>`:
//! - `TYPEDFILE__ENGINE__BASE_URL=https://engine.internal/files`
//! - `TYPEDFILE__ENGINE__MAX_RESPONSE_BYTES=16MB`
//!
//! The engine bearer token is only read from `TYPEDFILE_ENGINE_TOKEN`.
//!
//! # Configuration File
//!
//! Loaded from `config/typedfile.toml` unless `TYPEDFILE_CONFIG` names
//! another file.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, EngineConfig, EngineProvider};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment) and validate
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Like [`Config::load`], with an explicit file taking precedence over
    /// `TYPEDFILE_CONFIG`
    pub fn load_with(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_http_engine_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[engine]
provider = "http"
base_url = "http://engine:8080"
request_timeout_ms = 5000
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.engine.provider, EngineProvider::Http);
        assert_eq!(config.engine.request_timeout_ms, 5000);
    }

    #[test]
    fn test_validation_catches_missing_base_url() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[engine]\nprovider = \"http\"\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_load_local_engine_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = format!(
            "[engine]\nprovider = \"local\"\nroot = {:?}\n",
            temp_dir.path().display().to_string()
        );
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.engine.provider, EngineProvider::Local);
        assert_eq!(config.engine.root.as_deref(), Some(temp_dir.path()));
    }
}
