use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Log level from `NEARBY_LOG_LEVEL`, defaulting to `info`.
///
/// Readable without the rest of [`AppConfig`], so logging can start before
/// the catalog endpoint is known.
#[must_use]
pub fn log_level_from_env() -> String {
    log_level(|key| std::env::var(key))
}

/// Categories file path from `NEARBY_CATEGORIES_PATH`.
///
/// Listing categories needs only this file, not the catalog endpoint.
#[must_use]
pub fn categories_path_from_env() -> PathBuf {
    categories_path(|key| std::env::var(key))
}

fn log_level<F>(lookup: F) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup("NEARBY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

fn categories_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    PathBuf::from(
        lookup("NEARBY_CATEGORIES_PATH").unwrap_or_else(|_| "./config/categories.yaml".to_string()),
    )
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let require_http_url = |var: &str, raw: String| -> Result<String, ConfigError> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected an http(s) URL, got \"{raw}\""),
            })
        }
    };

    let catalog_url = require_http_url("NEARBY_CATALOG_URL", require("NEARBY_CATALOG_URL")?)?;

    let env = parse_environment(&or_default("NEARBY_ENV", "development"))?;
    let log_level = log_level(&lookup);
    let categories_path = categories_path(&lookup);

    let request_timeout_secs = parse_u64("NEARBY_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "NEARBY_USER_AGENT",
        "nearby-directory/0.1 (business-discovery)",
    );
    let max_retries = parse_u32("NEARBY_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("NEARBY_RETRY_BACKOFF_BASE_SECS", "1")?;

    let geocoder_url = require_http_url(
        "NEARBY_GEOCODER_URL",
        or_default(
            "NEARBY_GEOCODER_URL",
            "https://nominatim.openstreetmap.org/reverse",
        ),
    )?;
    let location_timeout_ms = parse_u64("NEARBY_LOCATION_TIMEOUT_MS", "10000")?;

    Ok(AppConfig {
        env,
        log_level,
        catalog_url,
        categories_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        geocoder_url,
        location_timeout_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
