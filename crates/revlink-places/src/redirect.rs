//! Redirect following from a possibly-shortened link to a canonical Maps URL.
//!
//! Short-link hosts increasingly answer with an HTML interstitial instead of a
//! real HTTP redirect, so a `200` landing page is scanned for an embedded
//! target before giving up on it.

use std::sync::LazyLock;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::{header, redirect::Policy, Client, StatusCode, Url};
use revlink_core::AppConfig;

use crate::error::PlacesError;
use crate::extract::is_canonical_maps_url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

static MAPS_PLACE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://www\.google\.[a-z.]+/maps/place/[^\s"'<>\\]+"#).expect("valid regex")
});
static META_REFRESH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+content=["']\s*\d+\s*;\s*url=['"]?(https?://[^"'>\s]+)"#)
        .expect("valid regex")
});
static WINDOW_LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"window\.location(?:\.href)?\s*(?:=|\.replace\(|\.assign\()\s*["']?(https?://[^\s"'<>)]+)"#,
    )
    .expect("valid regex")
});
static MAPS_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href=["'](https?://[^"']*google\.[^"']*/maps/[^"']+)["']"#).expect("valid regex")
});

/// What a scanned landing page points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LandingTarget {
    /// A canonical Maps link; resolution ends here without fetching it.
    Terminal(String),
    /// Another page that must be requested.
    Hop(Url),
}

/// Outcome of a single request in the redirect loop.
enum Step {
    Follow(Url),
    Done(String),
}

/// Position in the redirect loop. Lives for one `resolve` call only.
#[derive(Debug)]
struct RedirectState {
    current_url: Url,
    redirects_followed: usize,
}

impl RedirectState {
    fn new(start: Url) -> Self {
        Self {
            current_url: start,
            redirects_followed: 0,
        }
    }

    fn advance(&mut self, next: Url) {
        self.current_url = next;
        self.redirects_followed += 1;
    }

    /// URL to hand back after a transport failure: whatever the loop had
    /// discovered, or nothing when the very first request failed.
    fn after_failure(self) -> Option<String> {
        (self.redirects_followed > 0).then(|| self.current_url.into())
    }
}

/// Follows HTTP redirects, meta-refresh directives, and `window.location`
/// assignments up to a fixed hop cap.
///
/// Never fails: transport errors end the loop early and the furthest URL
/// reached is returned.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    client: Client,
    max_redirects: usize,
    max_body_bytes: usize,
}

impl RedirectResolver {
    /// Creates a resolver that sends `user_agent` on every hop and gives each
    /// request `timeout_secs` to complete.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_redirects: usize,
        max_body_bytes: usize,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            // Hops are counted and inspected here, not inside reqwest.
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            max_redirects,
            max_body_bytes,
        })
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::new(
            config.http_timeout_secs,
            &config.user_agent,
            config.max_redirects,
            config.max_body_bytes,
        )
    }

    /// Resolves `url` to the furthest URL reachable within the hop cap.
    ///
    /// Returns `None` only when the input cannot be parsed or the first
    /// request fails outright; callers then fall back to the raw input.
    pub async fn resolve(&self, url: &str) -> Option<String> {
        let normalized = normalize_input(url);
        let start = match Url::parse(&normalized) {
            Ok(start) => start,
            Err(e) => {
                tracing::debug!(url = %normalized, error = %e, "unparseable input URL");
                return None;
            }
        };

        let mut state = RedirectState::new(start);
        for hop in 0..self.max_redirects {
            tracing::debug!(hop, url = %state.current_url, "following redirect hop");
            match self.step(&state.current_url).await {
                Ok(Step::Follow(next)) => state.advance(next),
                Ok(Step::Done(resolved)) => return Some(resolved),
                Err(e) => {
                    tracing::warn!(
                        url = %state.current_url,
                        hop,
                        error = %e,
                        "redirect step failed; keeping last reached URL"
                    );
                    return state.after_failure();
                }
            }
        }

        tracing::debug!(
            url = %state.current_url,
            max_redirects = self.max_redirects,
            "hop cap reached"
        );
        Some(state.current_url.into())
    }

    async fn step(&self, current: &Url) -> Result<Step, PlacesError> {
        let response = self
            .client
            .get(current.clone())
            .header(header::ACCEPT, ACCEPT_HTML)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await?;
        let status = response.status();

        if is_redirect_status(status) {
            let Some(location) = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                return Ok(Step::Done(current.to_string()));
            };
            return Ok(match follow_location(current, location) {
                Some(next) => Step::Follow(next),
                None => {
                    tracing::debug!(url = %current, location, "redirect target not followable");
                    Step::Done(current.to_string())
                }
            });
        }

        if status != StatusCode::OK {
            tracing::debug!(url = %current, status = status.as_u16(), "non-redirect status");
            return Ok(Step::Done(current.to_string()));
        }

        if is_canonical_maps_url(current.as_str()) {
            return Ok(Step::Done(current.to_string()));
        }

        let body = read_body_prefix(response, self.max_body_bytes).await?;
        Ok(match scan_landing_page(&body) {
            Some(LandingTarget::Terminal(found)) => Step::Done(found),
            Some(LandingTarget::Hop(next)) => Step::Follow(next),
            None => Step::Done(current.to_string()),
        })
    }
}

/// Prepends `https://` when the input carries no HTTP(S) scheme.
#[must_use]
pub fn normalize_input(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn is_redirect_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Resolves a `Location` header against the current URL, refusing anything
/// that is not HTTP(S).
fn follow_location(current: &Url, location: &str) -> Option<Url> {
    current.join(location.trim()).ok().filter(is_http_scheme)
}

async fn read_body_prefix(
    mut response: reqwest::Response,
    max_bytes: usize,
) -> Result<String, PlacesError> {
    let mut buf: Vec<u8> = Vec::new();
    while buf.len() < max_bytes {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let take = chunk.len().min(max_bytes - buf.len());
        buf.extend_from_slice(&chunk[..take]);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Searches landing-page markup for where it wants to send the visitor.
///
/// Checked in priority order: an embedded canonical place URL, a
/// meta-refresh directive, a `window.location` assignment, then any anchor
/// pointing at a Maps URL.
pub(crate) fn scan_landing_page(body: &str) -> Option<LandingTarget> {
    if let Some(m) = MAPS_PLACE_URL_RE.find(body) {
        return Some(LandingTarget::Terminal(decode_embedded_url(m.as_str())));
    }

    let hop = [&*META_REFRESH_RE, &*WINDOW_LOCATION_RE]
        .into_iter()
        .find_map(|re| re.captures(body).and_then(|cap| cap.get(1)))
        .and_then(|m| Url::parse(&unescape_markup(m.as_str())).ok())
        .filter(is_http_scheme);
    if let Some(next) = hop {
        return Some(LandingTarget::Hop(next));
    }

    MAPS_ANCHOR_RE
        .captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| LandingTarget::Terminal(decode_embedded_url(m.as_str())))
}

fn decode_embedded_url(raw: &str) -> String {
    let unescaped = unescape_markup(raw);
    percent_decode_str(&unescaped)
        .decode_utf8_lossy()
        .into_owned()
}

/// Undoes the HTML-entity and JS-string escaping URLs pick up inside markup.
fn unescape_markup(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("\\u0026", "&")
        .replace("\\u003d", "=")
        .replace("\\/", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_input_adds_https() {
        assert_eq!(
            normalize_input("maps.app.goo.gl/abc123"),
            "https://maps.app.goo.gl/abc123"
        );
    }

    #[test]
    fn normalize_input_keeps_existing_scheme() {
        assert_eq!(
            normalize_input("  http://example.com/x  "),
            "http://example.com/x"
        );
        assert_eq!(
            normalize_input("HTTPS://Example.com/x"),
            "HTTPS://Example.com/x"
        );
    }

    #[test]
    fn relative_location_resolves_against_current_host() {
        let current = Url::parse("https://maps.app.goo.gl/abc123").unwrap();
        let next = follow_location(&current, "/maps/place/Cafe").unwrap();
        assert_eq!(next.as_str(), "https://maps.app.goo.gl/maps/place/Cafe");
    }

    #[test]
    fn absolute_location_replaces_host() {
        let current = Url::parse("https://maps.app.goo.gl/abc123").unwrap();
        let next = follow_location(&current, "https://www.google.com/maps/place/Cafe").unwrap();
        assert_eq!(next.host_str(), Some("www.google.com"));
    }

    #[test]
    fn non_http_location_is_not_followed() {
        let current = Url::parse("https://maps.app.goo.gl/abc123").unwrap();
        assert!(follow_location(&current, "intent://maps/place#Intent;end").is_none());
        assert!(follow_location(&current, "comgooglemaps://?q=cafe").is_none());
    }

    #[test]
    fn redirect_statuses() {
        for code in [301, 302, 303, 307, 308] {
            assert!(is_redirect_status(StatusCode::from_u16(code).unwrap()));
        }
        assert!(!is_redirect_status(StatusCode::OK));
        assert!(!is_redirect_status(StatusCode::NOT_MODIFIED));
    }

    #[test]
    fn scan_finds_embedded_place_url_and_decodes_it() {
        let body = r#"<html><script>var u = "https://www.google.com/maps/place/Pat%27s+Diner/data=!4m2!1sChIJxyz";</script></html>"#;
        assert_eq!(
            scan_landing_page(body),
            Some(LandingTarget::Terminal(
                "https://www.google.com/maps/place/Pat's+Diner/data=!4m2!1sChIJxyz".to_string()
            ))
        );
    }

    #[test]
    fn embedded_place_url_beats_meta_refresh() {
        let body = r#"<meta http-equiv="refresh" content="0;url=https://example.com/next">
            <a href="https://www.google.co.uk/maps/place/Cafe/">x</a>"#;
        assert!(matches!(
            scan_landing_page(body),
            Some(LandingTarget::Terminal(url)) if url == "https://www.google.co.uk/maps/place/Cafe/"
        ));
    }

    #[test]
    fn scan_follows_meta_refresh() {
        let body = r#"<head><META HTTP-EQUIV="Refresh" CONTENT="0; URL=https://example.com/next?a=1&amp;b=2"></head>"#;
        assert_eq!(
            scan_landing_page(body),
            Some(LandingTarget::Hop(
                Url::parse("https://example.com/next?a=1&b=2").unwrap()
            ))
        );
    }

    #[test]
    fn scan_follows_window_location_assignment() {
        let body = r#"<script>window.location.href = "https://example.com/js-hop";</script>"#;
        assert_eq!(
            scan_landing_page(body),
            Some(LandingTarget::Hop(
                Url::parse("https://example.com/js-hop").unwrap()
            ))
        );
    }

    #[test]
    fn scan_follows_window_location_replace() {
        let body = r#"<script>window.location.replace('https://example.com/replaced')</script>"#;
        assert_eq!(
            scan_landing_page(body),
            Some(LandingTarget::Hop(
                Url::parse("https://example.com/replaced").unwrap()
            ))
        );
    }

    #[test]
    fn meta_refresh_beats_window_location() {
        let body = r#"<meta http-equiv="refresh" content="0;url=https://example.com/meta">
            <script>window.location = "https://example.com/js";</script>"#;
        assert_eq!(
            scan_landing_page(body),
            Some(LandingTarget::Hop(Url::parse("https://example.com/meta").unwrap()))
        );
    }

    #[test]
    fn scan_falls_back_to_maps_anchor() {
        let body = r#"<a href="https://www.google.com/maps/search/Joe%27s+Pizza">Open in Maps</a>"#;
        assert_eq!(
            scan_landing_page(body),
            Some(LandingTarget::Terminal(
                "https://www.google.com/maps/search/Joe's+Pizza".to_string()
            ))
        );
    }

    #[test]
    fn scan_ignores_unrelated_markup() {
        let body = r#"<html><a href="https://example.com/about">About</a></html>"#;
        assert_eq!(scan_landing_page(body), None);
    }

    #[test]
    fn state_without_hops_reports_nothing_after_failure() {
        let state = RedirectState::new(Url::parse("https://maps.app.goo.gl/x").unwrap());
        assert_eq!(state.after_failure(), None);
    }

    #[test]
    fn state_after_hops_reports_last_url_after_failure() {
        let mut state = RedirectState::new(Url::parse("https://maps.app.goo.gl/x").unwrap());
        state.advance(Url::parse("https://www.google.com/maps/place/Cafe").unwrap());
        assert_eq!(
            state.after_failure().as_deref(),
            Some("https://www.google.com/maps/place/Cafe")
        );
    }
}
