use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "TYPEDFILE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/typedfile.toml";
const ENV_PREFIX: &str = "TYPEDFILE";
const ENV_SEPARATOR: &str = "__";
const TOKEN_ENV_VAR: &str = "TYPEDFILE_ENGINE_TOKEN";

/// Resolve the config file path: explicit path, then `TYPEDFILE_CONFIG`,
/// then the default location
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration with priority (lowest to highest):
/// defaults, TOML file, `.env` file, process environment
pub fn load(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let mut config = load_from_sources(config_path(explicit))?;
    load_secrets_from(&mut config, |key| env::var(key).ok());

    Ok(config)
}

/// Secrets never come from TOML files; `lookup` resolves environment keys
fn load_secrets_from(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(token) = lookup(TOKEN_ENV_VAR) {
        config.engine.token = Some(token);
    }
}

/// Load from a specific file plus environment overrides
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // TYPEDFILE__ENGINE__BASE_URL -> engine.base_url
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
