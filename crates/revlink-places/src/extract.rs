//! Pure URL-pattern extraction over a resolved Maps URL.
//!
//! Nothing here performs I/O. The three extractors are independent and may
//! all be applied to the same URL: the identifier is authoritative, the name
//! and coordinates are supplementary.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::Url;

use crate::types::Coordinates;

static PLACE_ID_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"place_id[=:]([A-Za-z0-9_-]+)").expect("valid regex"));
static PLACE_ID_BLOB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!1s(ChIJ[A-Za-z0-9_-]+)").expect("valid regex"));
static PLACE_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/maps/place/([^/@?#]+)").expect("valid regex"));
static SEARCH_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/maps/search/([^/@?#]+)").expect("valid regex"));
static COORDINATES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([-+]?\d+\.\d+),([-+]?\d+\.\d+)").expect("valid coordinates regex")
});

/// Query parameters that carry a free-text search on Maps URLs without a
/// `/maps/search/<query>` path segment, in priority order.
const QUERY_PARAMS: [&str; 2] = ["query", "q"];

/// Extracts a place identifier from `url`.
///
/// An explicit `place_id=` / `place_id:` parameter wins over the `!1sChIJ...`
/// token embedded in a `data=` blob, even when both are present and disagree.
#[must_use]
pub fn extract_place_identifier(url: &str) -> Option<String> {
    PLACE_ID_PARAM_RE
        .captures(url)
        .or_else(|| PLACE_ID_BLOB_RE.captures(url))
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extracts the business name from `/maps/place/<name>` or the free-text query
/// from `/maps/search/<query>`, URL-decoded with `+` read as a space.
///
/// Falls back to a `query=` or `q=` parameter on Maps URLs whose path carries
/// no such segment (`/maps/search/?api=1&query=...`, `maps.google.com/?q=...`).
#[must_use]
pub fn extract_name_or_query(url: &str) -> Option<String> {
    PLACE_SEGMENT_RE
        .captures(url)
        .or_else(|| SEARCH_SEGMENT_RE.captures(url))
        .and_then(|cap| cap.get(1))
        .and_then(|m| decode_segment(m.as_str()))
        .or_else(|| query_param_search(url))
}

/// Extracts the `@<lat>,<lng>` viewport centre from `url`.
///
/// Out-of-range values are rejected rather than clamped.
#[must_use]
pub fn extract_coordinates(url: &str) -> Option<Coordinates> {
    let cap = COORDINATES_RE.captures(url)?;
    let latitude: f64 = cap.get(1)?.as_str().parse().ok()?;
    let longitude: f64 = cap.get(2)?.as_str().parse().ok()?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Coordinates::new(latitude, longitude))
}

/// Returns `true` when `url` already encodes a place or search in its path,
/// i.e. there is nothing left to follow.
#[must_use]
pub fn is_canonical_maps_url(url: &str) -> bool {
    url.contains("/maps/place/") || url.contains("/maps/search/")
}

fn decode_segment(raw: &str) -> Option<String> {
    let plus_as_space = raw.replace('+', " ");
    // `%2B` decodes to a literal plus, which Maps slugs also use as a separator.
    let decoded = percent_decode_str(&plus_as_space)
        .decode_utf8_lossy()
        .replace('+', " ");
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn query_param_search(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let is_maps = parsed.path().starts_with("/maps")
        || parsed
            .host_str()
            .is_some_and(|host| host.starts_with("maps."));
    if !is_maps {
        return None;
    }

    QUERY_PARAMS.iter().find_map(|wanted| {
        parsed
            .query_pairs()
            .find(|(key, _)| key == wanted)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
