use std::fmt;

use serde::{Deserialize, Serialize};

const REVIEW_URL_BASE: &str = "https://search.google.com/local/writereview";

/// Canonical identity of a place: the provider identifier is authoritative,
/// the name is best-effort display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub name: String,
    pub place_id: String,
}

impl ResolvedPlace {
    #[must_use]
    pub fn new(name: impl Into<String>, place_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            place_id: place_id.into(),
        }
    }

    /// Link that opens the provider's "write a review" dialog for this place.
    #[must_use]
    pub fn review_url(&self) -> String {
        let mut url = reqwest::Url::parse(REVIEW_URL_BASE).expect("valid review URL constant");
        url.query_pairs_mut().append_pair("placeid", &self.place_id);
        url.into()
    }
}

/// Latitude/longitude pair lifted from a Maps URL. Only ever used to bias a
/// text search, never as an identity on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Renders as `lat,lng`, the form the provider accepts for both free-text
/// input and `point:` location bias. Whole degrees keep their decimal point
/// (`40.0`, not `40`).
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?},{:?}", self.latitude, self.longitude)
    }
}
