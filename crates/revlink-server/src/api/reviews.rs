use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use revlink_reviews::{
    issue_review_request, ReviewError, ReviewRequest, ReviewStats, ReviewStatus,
};
use serde::{Deserialize, Serialize};

use super::places::ResolvedPlaceItem;
use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// Cap on the request list returned alongside stats.
const RECENT_LIMIT: usize = 100;

const UNRESOLVABLE_LINK_MESSAGE: &str =
    "Could not resolve Google link. Check GOOGLE_API_KEY and the link.";

#[derive(Debug, Deserialize)]
pub(super) struct CreateReviewRequestBody {
    #[serde(default)]
    google_link: String,
    #[serde(default)]
    customer_name: String,
    customer_contact: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct IssuedReviewItem {
    short_code: String,
    link: String,
    status: ReviewStatus,
    sent_at: DateTime<Utc>,
    place: ResolvedPlaceItem,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatsQuery {
    place_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReviewSummaryItem {
    short_code: String,
    customer_name: String,
    customer_contact: Option<String>,
    status: ReviewStatus,
    sent_at: DateTime<Utc>,
    clicked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReviewStatsData {
    stats: ReviewStats,
    reviews: Vec<ReviewSummaryItem>,
}

impl From<ReviewRequest> for ReviewSummaryItem {
    fn from(rr: ReviewRequest) -> Self {
        Self {
            short_code: rr.short_code,
            customer_name: rr.customer_name,
            customer_contact: rr.customer_contact,
            status: rr.status,
            sent_at: rr.sent_at,
            clicked_at: rr.clicked_at,
        }
    }
}

fn store_error(req_id: String, err: &ReviewError) -> ApiError {
    match err {
        ReviewError::MissingField { .. } => ApiError::new(req_id, "bad_request", err.to_string()),
        _ => {
            tracing::error!(error = %err, "review store failure");
            ApiError::new(req_id, "internal_error", "review request could not be stored")
        }
    }
}

/// `POST /api/v1/review-requests`
///
/// Resolves the business link, then issues a tracked short link for the
/// customer. Delivering the link is the caller's job.
pub(super) async fn create_review_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateReviewRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.customer_name.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "Customer name is required.",
        ));
    }
    let google_link = body.google_link.trim();
    if google_link.is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "URL is required"));
    }

    let Some(place) = state.resolver.resolve(google_link).await else {
        tracing::info!(url = google_link, "review-requests: unresolvable link");
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            UNRESOLVABLE_LINK_MESSAGE,
        ));
    };

    let rr = issue_review_request(
        state.reviews.as_ref(),
        place,
        &body.customer_name,
        body.customer_contact.as_deref(),
    )
    .await
    .map_err(|e| store_error(req_id.0.clone(), &e))?;

    let item = IssuedReviewItem {
        link: format!("{}/api/v1/r/{}", state.public_base_url, rr.short_code),
        short_code: rr.short_code,
        status: rr.status,
        sent_at: rr.sent_at,
        place: ResolvedPlaceItem::from(rr.place),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: item,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/v1/r/{code}`
///
/// Records the click and sends the customer on to the write-a-review page.
pub(super) async fn follow_review_link(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(code): Path<String>,
) -> Result<Redirect, ApiError> {
    let clicked = state
        .reviews
        .record_click(&code, Utc::now())
        .await
        .map_err(|e| store_error(req_id.0.clone(), &e))?;

    match clicked {
        Some(rr) => Ok(Redirect::temporary(&rr.place.review_url())),
        None => Err(ApiError::new(req_id.0, "not_found", "Link not found")),
    }
}

/// `GET /api/v1/review-requests/stats?place_id=...`
pub(super) async fn review_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<StatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let place_id = params.place_id.as_deref().map(str::trim).unwrap_or_default();
    if place_id.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "place_id is required",
        ));
    }

    let stats = state
        .reviews
        .stats_for_place(place_id)
        .await
        .map_err(|e| store_error(req_id.0.clone(), &e))?;
    let reviews = state
        .reviews
        .recent_for_place(place_id, RECENT_LIMIT)
        .await
        .map_err(|e| store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ReviewStatsData {
            stats,
            reviews: reviews.into_iter().map(ReviewSummaryItem::from).collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
