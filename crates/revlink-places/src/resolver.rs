//! Ordered fallback from an arbitrary Maps link to a [`ResolvedPlace`].

use revlink_core::AppConfig;

use crate::error::PlacesError;
use crate::extract::{extract_coordinates, extract_name_or_query, extract_place_identifier};
use crate::lookup::PlacesClient;
use crate::redirect::{normalize_input, RedirectResolver};
use crate::types::ResolvedPlace;

/// Display name used when an identifier is known but no name could be
/// recovered from the URL or the provider.
pub const FALLBACK_PLACE_NAME: &str = "Business";

/// Resolves Maps links through redirects, URL patterns, and the place-data
/// provider, in that order.
///
/// Holds no mutable state; one instance is shared across concurrent
/// requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PlaceResolver {
    redirects: RedirectResolver,
    places: PlacesClient,
}

impl PlaceResolver {
    #[must_use]
    pub fn new(redirects: RedirectResolver, places: PlacesClient) -> Self {
        Self { redirects, places }
    }

    /// # Errors
    ///
    /// Returns [`PlacesError`] if either HTTP client cannot be constructed or
    /// the configured provider base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Ok(Self::new(
            RedirectResolver::from_config(config)?,
            PlacesClient::from_config(config)?,
        ))
    }

    #[must_use]
    pub fn has_places_credential(&self) -> bool {
        self.places.has_credential()
    }

    /// Resolves `raw_url` to a place, or `None` once every strategy is
    /// exhausted.
    ///
    /// A URL carrying a place identifier always resolves, credential or not.
    /// A bare search URL needs the provider and therefore a credential.
    pub async fn resolve(&self, raw_url: &str) -> Option<ResolvedPlace> {
        let full_url = match self.redirects.resolve(raw_url).await {
            Some(resolved) => resolved,
            None => normalize_input(raw_url),
        };
        tracing::debug!(raw_url, full_url = %full_url, "redirects resolved");

        if let Some(place_id) = extract_place_identifier(&full_url) {
            let place = self.resolve_identifier(&full_url, place_id).await;
            tracing::info!(place_id = %place.place_id, name = %place.name, "resolved from URL identifier");
            return Some(place);
        }

        let query = extract_name_or_query(&full_url);
        let coordinates = extract_coordinates(&full_url);

        if !self.places.has_credential() {
            tracing::info!(
                url = %full_url,
                "no place identifier in URL and no places credential configured"
            );
            return None;
        }

        if let Some(query) = query.as_deref() {
            if let Some(place) = self.places.find_place_from_text(query, coordinates).await {
                tracing::info!(place_id = %place.place_id, query, "resolved by text search");
                return Some(place);
            }
        } else if let Some(coordinates) = coordinates {
            let coordinate_query = coordinates.to_string();
            if let Some(place) = self
                .places
                .find_place_from_text(&coordinate_query, Some(coordinates))
                .await
            {
                tracing::info!(place_id = %place.place_id, query = %coordinate_query, "resolved by coordinate search");
                return Some(place);
            }
        }

        tracing::info!(url = %full_url, "could not resolve place");
        None
    }

    /// Builds the result for a URL that already names its identifier: the
    /// slug-derived name, upgraded to the provider's name when available.
    async fn resolve_identifier(&self, full_url: &str, place_id: String) -> ResolvedPlace {
        let slug_name =
            extract_name_or_query(full_url).unwrap_or_else(|| FALLBACK_PLACE_NAME.to_string());

        let name = if self.places.has_credential() {
            self.places
                .get_place_name(&place_id)
                .await
                .unwrap_or(slug_name)
        } else {
            slug_name
        };

        ResolvedPlace::new(name, place_id)
    }
}
