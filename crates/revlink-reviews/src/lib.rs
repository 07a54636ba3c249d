//! Review requests: short tracking codes handed to customers, the click that
//! turns a `sent` request into `clicked`, and per-place send/click stats.
//!
//! Storage sits behind [`ReviewStore`]; [`MemoryReviewStore`] is the bundled
//! backend. Delivery of the link (SMS, email) is left to the caller.

pub mod code;
pub mod error;
pub mod issue;
pub mod store;
pub mod types;

pub use code::{generate_short_code, SHORT_CODE_LEN};
pub use error::ReviewError;
pub use issue::issue_review_request;
pub use store::{MemoryReviewStore, ReviewStore};
pub use types::{ReviewRequest, ReviewStats, ReviewStatus};
