//! HTTP client for the place-data provider's text-search and details endpoints.
//!
//! Both calls are gated on a credential injected at construction. Without
//! one every lookup answers `None` without touching the network, which
//! narrows resolution to URLs that already carry an identifier.

use std::time::Duration;

use reqwest::{Client, Url};
use revlink_core::AppConfig;
use serde::Deserialize;

use crate::error::PlacesError;
use crate::types::{Coordinates, ResolvedPlace};

const FIND_PLACE_ENDPOINT: &str = "findplacefromtext/json";
const DETAILS_ENDPOINT: &str = "details/json";

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    place_id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    result: Option<DetailsResult>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    #[serde(default)]
    name: Option<String>,
}

/// Client for the provider's find-place and place-details APIs.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            revlink_core::app_config::DEFAULT_PLACES_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`PlacesError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .build()?;

        // Exactly one trailing slash so endpoint joins append rather than
        // replace the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            base_url: parsed,
        })
    }

    /// # Errors
    ///
    /// Same as [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            config.google_api_key.as_deref(),
            config.http_timeout_secs,
            &config.places_base_url,
        )
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Finds the first candidate matching `query`, biased towards
    /// `coordinates` when given.
    ///
    /// Transport failures, provider errors, and empty candidate lists all
    /// yield `None`.
    pub async fn find_place_from_text(
        &self,
        query: &str,
        coordinates: Option<Coordinates>,
    ) -> Option<ResolvedPlace> {
        match self.request_find_place(query, coordinates).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(query, error = %e, "find-place request failed");
                None
            }
        }
    }

    /// Looks up the authoritative display name for `place_id`.
    ///
    /// Any failure yields `None`; callers keep whatever name they already had.
    pub async fn get_place_name(&self, place_id: &str) -> Option<String> {
        match self.request_place_name(place_id).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(place_id, error = %e, "place-details request failed");
                None
            }
        }
    }

    /// Error-preserving form of [`PlacesClient::find_place_from_text`].
    ///
    /// Returns `Ok(None)` when no credential is configured or the provider
    /// reports no candidates.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body is not the expected JSON.
    /// - [`PlacesError::ApiStatus`] for a quota, credential, or request error.
    pub async fn request_find_place(
        &self,
        query: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<Option<ResolvedPlace>, PlacesError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let bias = coordinates.map(|c| format!("point:{c}"));
        let mut params = vec![
            ("input", query),
            ("inputtype", "textquery"),
            ("fields", "place_id,name"),
            ("key", api_key),
        ];
        if let Some(bias) = bias.as_deref() {
            params.push(("locationbias", bias));
        }

        let url = self.build_url(FIND_PLACE_ENDPOINT, &params)?;
        let response: FindPlaceResponse = self.request_json(url, "findplacefromtext").await?;
        check_status(response.status.as_deref(), response.error_message)?;

        let place = response
            .candidates
            .into_iter()
            .next()
            .filter(|c| !c.place_id.is_empty())
            .map(|c| {
                let name = c
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| query.to_string());
                ResolvedPlace::new(name, c.place_id)
            });

        tracing::debug!(query, found = place.is_some(), "find-place completed");
        Ok(place)
    }

    /// Error-preserving form of [`PlacesClient::get_place_name`].
    ///
    /// # Errors
    ///
    /// Same variants as [`PlacesClient::request_find_place`].
    pub async fn request_place_name(&self, place_id: &str) -> Result<Option<String>, PlacesError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let url = self.build_url(
            DETAILS_ENDPOINT,
            &[("place_id", place_id), ("fields", "name"), ("key", api_key)],
        )?;
        let response: DetailsResponse = self.request_json(url, "details").await?;
        check_status(response.status.as_deref(), response.error_message)?;

        Ok(response
            .result
            .and_then(|r| r.name)
            .filter(|n| !n.trim().is_empty()))
    }

    /// Joins `endpoint` onto the base URL and appends percent-encoded
    /// query parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn request_json<T>(&self, url: Url, context: &str) -> Result<T, PlacesError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// `OK` and `ZERO_RESULTS` are normal answers; every other status is a
/// provider-side rejection.
fn check_status(status: Option<&str>, error_message: Option<String>) -> Result<(), PlacesError> {
    match status {
        None | Some("OK" | "ZERO_RESULTS") => Ok(()),
        Some(other) => Err(PlacesError::ApiStatus {
            status: other.to_string(),
            message: error_message.unwrap_or_else(|| "no error message".to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(api_key: Option<&str>, base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url(api_key, 5, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_endpoint_to_base_path() {
        let client = test_client(Some("k"), "https://maps.googleapis.com/maps/api/place");
        let url = client
            .build_url(DETAILS_ENDPOINT, &[("place_id", "ChIJ1"), ("key", "k")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/details/json?place_id=ChIJ1&key=k"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client(Some("k"), "https://maps.googleapis.com/maps/api/place/");
        let url = client
            .build_url(FIND_PLACE_ENDPOINT, &[("input", "Joe's Pizza & Pasta")])
            .unwrap();
        assert!(
            url.as_str().contains("input=Joe%27s+Pizza+%26+Pasta"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn blank_credential_is_treated_as_absent() {
        let client = test_client(Some("   "), "https://maps.googleapis.com/maps/api/place/");
        assert!(!client.has_credential());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = PlacesClient::with_base_url(Some("k"), 5, "not a url");
        assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn check_status_accepts_ok_and_zero_results() {
        assert!(check_status(Some("OK"), None).is_ok());
        assert!(check_status(Some("ZERO_RESULTS"), None).is_ok());
        assert!(check_status(None, None).is_ok());
    }

    #[test]
    fn check_status_surfaces_provider_rejection() {
        let err = check_status(
            Some("REQUEST_DENIED"),
            Some("The provided API key is invalid.".to_string()),
        )
        .unwrap_err();
        assert!(
            matches!(err, PlacesError::ApiStatus { ref status, ref message }
                if status == "REQUEST_DENIED" && message.contains("invalid"))
        );
    }
}
