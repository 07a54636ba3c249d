use std::net::SocketAddr;

/// Desktop browser identity sent on redirect hops. Short-link hosts serve
/// bot-detection interstitials to unfamiliar user agents.
pub const DEFAULT_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Origin prepended to review-request short links (`/api/v1/r/{code}`).
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Hard ceiling on hops followed for one input URL.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Landing pages for short links are small; anything past this prefix is not
/// worth downloading.
pub const DEFAULT_MAX_BODY_BYTES: usize = 100_000;

pub const DEFAULT_RATE_LIMIT_PER_MINUTE: usize = 60;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Place-data provider credential. `None` narrows resolution to URLs
    /// that already carry a place identifier.
    pub google_api_key: Option<String>,
    pub places_base_url: String,
    pub public_base_url: String,
    pub http_timeout_secs: u64,
    pub max_redirects: usize,
    pub max_body_bytes: usize,
    pub user_agent: String,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("public_base_url", &self.public_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_redirects", &self.max_redirects)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("user_agent", &self.user_agent)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
