use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use revlink_places::ResolvedPlace;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

const UNRESOLVABLE_MESSAGE: &str = "Could not resolve place. Check the URL or GOOGLE_API_KEY.";

#[derive(Debug, Deserialize)]
pub(super) struct ResolvePlaceQuery {
    pub(super) url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResolvedPlaceItem {
    pub(super) name: String,
    pub(super) place_id: String,
    pub(super) review_url: String,
}

impl From<ResolvedPlace> for ResolvedPlaceItem {
    fn from(place: ResolvedPlace) -> Self {
        let review_url = place.review_url();
        Self {
            name: place.name,
            place_id: place.place_id,
            review_url,
        }
    }
}

/// `GET /api/v1/resolve-place?url=...`
///
/// Empty input is rejected before any network work; an exhausted resolution
/// is a 404 pointing at the two usual causes.
pub(super) async fn resolve_place(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ResolvePlaceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let url = params.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "URL is required"));
    }

    let Some(place) = state.resolver.resolve(url).await else {
        tracing::info!(url, "resolve-place: unresolvable");
        return Err(ApiError::new(req_id.0, "not_found", UNRESOLVABLE_MESSAGE));
    };

    Ok(Json(ApiResponse {
        data: ResolvedPlaceItem::from(place),
        meta: ResponseMeta::new(req_id.0),
    }))
}
