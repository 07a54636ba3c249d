use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::ReviewError;
use crate::types::{ReviewRequest, ReviewStats, ReviewStatus};

/// Storage for review requests, keyed by short code.
///
/// The server holds this as `Arc<dyn ReviewStore>`, so a database-backed
/// implementation can replace [`MemoryReviewStore`] without touching routes.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Store a new request.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::DuplicateCode`] when the short code is taken.
    async fn insert(&self, request: ReviewRequest) -> Result<(), ReviewError>;

    /// Record a click on `code` and return the updated request, or `None`
    /// for an unknown code.
    ///
    /// # Errors
    ///
    /// Backend failures only; the in-memory store never fails.
    async fn record_click(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ReviewRequest>, ReviewError>;

    /// # Errors
    ///
    /// Backend failures only.
    async fn stats_for_place(&self, place_id: &str) -> Result<ReviewStats, ReviewError>;

    /// Most recently sent requests for `place_id`, newest first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn recent_for_place(
        &self,
        place_id: &str,
        limit: usize,
    ) -> Result<Vec<ReviewRequest>, ReviewError>;
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    requests: RwLock<HashMap<String, ReviewRequest>>,
}

impl MemoryReviewStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, request: ReviewRequest) -> Result<(), ReviewError> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.short_code) {
            return Err(ReviewError::DuplicateCode {
                code: request.short_code,
            });
        }
        requests.insert(request.short_code.clone(), request);
        Ok(())
    }

    async fn record_click(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ReviewRequest>, ReviewError> {
        let mut requests = self.requests.write().await;
        let Some(request) = requests.get_mut(code) else {
            return Ok(None);
        };
        if request.record_click(at) {
            tracing::info!(code, place_id = %request.place.place_id, "review link clicked");
        }
        Ok(Some(request.clone()))
    }

    async fn stats_for_place(&self, place_id: &str) -> Result<ReviewStats, ReviewError> {
        let requests = self.requests.read().await;
        let (sent, clicked) = requests
            .values()
            .filter(|r| r.place.place_id == place_id)
            .fold((0_u64, 0_u64), |(sent, clicked), r| {
                let clicked = clicked + u64::from(r.status == ReviewStatus::Clicked);
                (sent + 1, clicked)
            });
        Ok(ReviewStats::from_counts(sent, clicked))
    }

    async fn recent_for_place(
        &self,
        place_id: &str,
        limit: usize,
    ) -> Result<Vec<ReviewRequest>, ReviewError> {
        let requests = self.requests.read().await;
        let mut matching: Vec<ReviewRequest> = requests
            .values()
            .filter(|r| r.place.place_id == place_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        matching.truncate(limit);
        Ok(matching)
    }
}
