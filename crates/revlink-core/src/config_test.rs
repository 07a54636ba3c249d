use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_environment() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.google_api_key.is_none());
    assert_eq!(cfg.places_base_url, DEFAULT_PLACES_BASE_URL);
    assert_eq!(cfg.public_base_url, "http://localhost:8000");
    assert_eq!(cfg.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    assert_eq!(cfg.max_redirects, 10);
    assert_eq!(cfg.max_redirects, DEFAULT_MAX_REDIRECTS);
    assert_eq!(cfg.max_body_bytes, 100_000);
    assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    assert_eq!(cfg.user_agent, DEFAULT_BROWSER_USER_AGENT);
    assert_eq!(cfg.rate_limit_per_minute, DEFAULT_RATE_LIMIT_PER_MINUTE);
}

#[test]
fn google_api_key_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_API_KEY", "  abc123  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.google_api_key.as_deref(), Some("abc123"));
}

#[test]
fn blank_google_api_key_counts_as_unset() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.google_api_key.is_none());
}

#[test]
fn debug_output_redacts_google_api_key() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_API_KEY", "super-secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-key"), "{rendered}");
    assert!(rendered.contains("[redacted]"), "{rendered}");
}

#[test]
fn bind_addr_override() {
    let mut map = HashMap::new();
    map.insert("REVLINK_BIND_ADDR", "127.0.0.1:9090");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.bind_addr.port(), 9090);
}

#[test]
fn bind_addr_invalid() {
    let mut map = HashMap::new();
    map.insert("REVLINK_BIND_ADDR", "not-an-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVLINK_BIND_ADDR"),
        "expected InvalidEnvVar(REVLINK_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn http_timeout_secs_override() {
    let mut map = HashMap::new();
    map.insert("REVLINK_HTTP_TIMEOUT_SECS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.http_timeout_secs, 3);
}

#[test]
fn http_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("REVLINK_HTTP_TIMEOUT_SECS", "ten");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVLINK_HTTP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(REVLINK_HTTP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_redirects_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("REVLINK_MAX_REDIRECTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVLINK_MAX_REDIRECTS"),
        "expected InvalidEnvVar(REVLINK_MAX_REDIRECTS), got: {result:?}"
    );
}

#[test]
fn max_body_bytes_override() {
    let mut map = HashMap::new();
    map.insert("REVLINK_MAX_BODY_BYTES", "4096");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_body_bytes, 4096);
}

#[test]
fn places_base_url_override() {
    let mut map = HashMap::new();
    map.insert("REVLINK_PLACES_BASE_URL", "http://127.0.0.1:9999/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.places_base_url, "http://127.0.0.1:9999/");
}

#[test]
fn rate_limit_per_minute_invalid() {
    let mut map = HashMap::new();
    map.insert("REVLINK_RATE_LIMIT_PER_MINUTE", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVLINK_RATE_LIMIT_PER_MINUTE"),
        "expected InvalidEnvVar(REVLINK_RATE_LIMIT_PER_MINUTE), got: {result:?}"
    );
}

#[test]
fn public_base_url_drops_trailing_slash() {
    let mut map = HashMap::new();
    map.insert("REVLINK_PUBLIC_BASE_URL", "https://reviews.example.com/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.public_base_url, "https://reviews.example.com");
}

#[test]
fn revlink_env_is_no_longer_read() {
    let mut map = HashMap::new();
    map.insert("REVLINK_ENV", "staging");
    assert!(build_app_config(lookup_from_map(&map)).is_ok());
}
