use chrono::Utc;
use revlink_places::ResolvedPlace;

use crate::code::{generate_short_code, SHORT_CODE_LEN};
use crate::error::ReviewError;
use crate::store::ReviewStore;
use crate::types::ReviewRequest;

/// Fresh codes drawn before giving up on a crowded code space.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Create and store a `sent` review request for `place` under a new code.
///
/// # Errors
///
/// - [`ReviewError::MissingField`] for a blank customer name.
/// - [`ReviewError::CodeSpaceExhausted`] when every drawn code was taken.
/// - Any other store error, unchanged.
pub async fn issue_review_request(
    store: &dyn ReviewStore,
    place: ResolvedPlace,
    customer_name: &str,
    customer_contact: Option<&str>,
) -> Result<ReviewRequest, ReviewError> {
    let customer_name = customer_name.trim();
    if customer_name.is_empty() {
        return Err(ReviewError::MissingField {
            field: "customer_name",
        });
    }
    let customer_contact = customer_contact
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from);

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let request = ReviewRequest::new(
            generate_short_code(SHORT_CODE_LEN),
            place.clone(),
            customer_name,
            customer_contact.clone(),
            Utc::now(),
        );
        match store.insert(request.clone()).await {
            Ok(()) => {
                tracing::info!(
                    code = %request.short_code,
                    place_id = %request.place.place_id,
                    "review request issued"
                );
                return Ok(request);
            }
            Err(ReviewError::DuplicateCode { code }) => {
                tracing::debug!(attempt, code, "short code collision, drawing another");
            }
            Err(e) => return Err(e),
        }
    }

    Err(ReviewError::CodeSpaceExhausted {
        attempts: MAX_CODE_ATTEMPTS,
    })
}
