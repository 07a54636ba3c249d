use std::net::SocketAddr;
use std::str::FromStr;

use crate::app_config::{
    AppConfig, DEFAULT_BROWSER_USER_AGENT, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_MAX_REDIRECTS, DEFAULT_PLACES_BASE_URL, DEFAULT_PUBLIC_BASE_URL,
    DEFAULT_RATE_LIMIT_PER_MINUTE,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup
/// instead of calling `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let bind_addr = parse_or(
        &lookup,
        "REVLINK_BIND_ADDR",
        SocketAddr::from(([0, 0, 0, 0], 8000)),
    )?;
    let log_level = or_default("REVLINK_LOG_LEVEL", "info");

    // A blank key in .env is common; treat it as absent rather than sending
    // empty credentials upstream.
    let google_api_key = lookup("GOOGLE_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let places_base_url = or_default("REVLINK_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let public_base_url = or_default("REVLINK_PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    let http_timeout_secs =
        parse_or(&lookup, "REVLINK_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
    let max_redirects = parse_or(&lookup, "REVLINK_MAX_REDIRECTS", DEFAULT_MAX_REDIRECTS)?;
    if max_redirects == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REVLINK_MAX_REDIRECTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_body_bytes = parse_or(&lookup, "REVLINK_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
    let user_agent = or_default("REVLINK_USER_AGENT", DEFAULT_BROWSER_USER_AGENT);
    let rate_limit_per_minute = parse_or(
        &lookup,
        "REVLINK_RATE_LIMIT_PER_MINUTE",
        DEFAULT_RATE_LIMIT_PER_MINUTE,
    )?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        google_api_key,
        places_base_url,
        public_base_url,
        http_timeout_secs,
        max_redirects,
        max_body_bytes,
        user_agent,
        rate_limit_per_minute,
    })
}

/// Parse `var` when set, otherwise fall back to the typed `default`.
fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
