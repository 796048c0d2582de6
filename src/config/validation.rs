use super::models::{Config, EngineConfig, EngineProvider};
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Engine provider 'http' requires engine.base_url")]
    MissingBaseUrl,

    #[error("Invalid engine base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Engine provider 'local' requires engine.root")]
    MissingRoot,

    #[error("Engine root '{0}' is not a directory")]
    RootNotDirectory(String),

    #[error("engine.max_retries must be at least 1")]
    InvalidMaxRetries,

    #[error("engine.max_response_bytes must be positive")]
    InvalidMaxResponseBytes,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_engine(&config.engine)
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ValidationError> {
    match engine.provider {
        EngineProvider::Http => validate_base_url(engine.base_url.as_deref())?,
        EngineProvider::Local => {
            let root = engine.root.as_ref().ok_or(ValidationError::MissingRoot)?;
            if !root.is_dir() {
                return Err(ValidationError::RootNotDirectory(root.display().to_string()));
            }
        }
        EngineProvider::Memory => {}
    }

    if engine.max_retries == 0 {
        return Err(ValidationError::InvalidMaxRetries);
    }

    if engine.max_response_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidMaxResponseBytes);
    }

    Ok(())
}

fn validate_base_url(base_url: Option<&str>) -> Result<(), ValidationError> {
    let raw = base_url.ok_or(ValidationError::MissingBaseUrl)?;
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::ByteSize;
    use tempfile::TempDir;

    fn http_config(base_url: Option<&str>) -> Config {
        Config {
            engine: EngineConfig {
                base_url: base_url.map(str::to_string),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_valid_http_config() {
        assert!(validate(&http_config(Some("https://engine.example.com/files"))).is_ok());
    }

    #[test]
    fn test_missing_base_url() {
        let result = validate(&http_config(None));
        assert!(matches!(result, Err(ValidationError::MissingBaseUrl)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = validate(&http_config(Some("ftp://engine/files")));
        assert!(matches!(result, Err(ValidationError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_local_root_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.engine.provider = EngineProvider::Local;

        assert!(matches!(validate(&config), Err(ValidationError::MissingRoot)));

        config.engine.root = Some(temp_dir.path().join("missing"));
        assert!(matches!(validate(&config), Err(ValidationError::RootNotDirectory(_))));

        config.engine.root = Some(temp_dir.path().to_path_buf());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_memory_provider_needs_no_location() {
        let mut config = Config::default();
        config.engine.provider = EngineProvider::Memory;

        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_limits_must_be_positive() {
        let mut config = http_config(Some("http://engine"));
        config.engine.max_retries = 0;
        assert!(matches!(validate(&config), Err(ValidationError::InvalidMaxRetries)));

        config.engine.max_retries = 1;
        config.engine.max_response_bytes = ByteSize(0);
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidMaxResponseBytes)
        ));
    }
}
