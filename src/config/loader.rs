//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Overrides `env`.
pub const ENV_OVERRIDE: &str = "ENV";
/// Overrides `http_server.address`.
pub const HTTP_SERVER_ADDR_ENV: &str = "HTTP_SERVER_ADDR";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config path is not set (use CONFIG_PATH or --config)")]
    PathNotSet,

    #[error("config file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pick the config path: the environment variable wins over the CLI flag.
pub fn resolve_config_path(
    env_value: Option<String>,
    flag: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let path = env_value
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .or(flag)
        .ok_or(ConfigError::PathNotSet)?;

    if !path.exists() {
        return Err(ConfigError::NotFound(path));
    }
    Ok(path)
}

/// Load, apply environment overrides to, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`] but reads overrides through `lookup`.
pub fn load_config_with<F>(path: &Path, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, lookup);
    config.http_server.address = normalize_address(&config.http_server.address);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(env) = lookup(ENV_OVERRIDE).filter(|v| !v.is_empty()) {
        config.env = env;
    }
    if let Some(address) = lookup(HTTP_SERVER_ADDR_ENV).filter(|v| !v.is_empty()) {
        config.http_server.address = address;
    }
}

/// `:8080` binds every interface.
fn normalize_address(address: &str) -> String {
    match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => address.to_string(),
    }
}
