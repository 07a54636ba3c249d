use chrono::{DateTime, Utc};
use revlink_places::ResolvedPlace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Sent,
    Clicked,
}

/// One review link handed to one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub short_code: String,
    pub place: ResolvedPlace,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub status: ReviewStatus,
    pub sent_at: DateTime<Utc>,
    pub clicked_at: Option<DateTime<Utc>>,
}

impl ReviewRequest {
    #[must_use]
    pub fn new(
        short_code: impl Into<String>,
        place: ResolvedPlace,
        customer_name: impl Into<String>,
        customer_contact: Option<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            short_code: short_code.into(),
            place,
            customer_name: customer_name.into(),
            customer_contact,
            status: ReviewStatus::Sent,
            sent_at,
            clicked_at: None,
        }
    }

    /// Moves `sent` to `clicked` stamped with `at`. Repeat clicks keep the
    /// first timestamp. Returns whether the status changed.
    pub fn record_click(&mut self, at: DateTime<Utc>) -> bool {
        if self.status != ReviewStatus::Sent {
            return false;
        }
        self.status = ReviewStatus::Clicked;
        self.clicked_at = Some(at);
        true
    }
}

/// Send/click totals for one place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total_sent: u64,
    pub total_clicked: u64,
    /// Percentage of sent links clicked, one decimal place; `0.0` when
    /// nothing was sent.
    pub click_rate: f64,
}

impl ReviewStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(total_sent: u64, total_clicked: u64) -> Self {
        let click_rate = if total_sent == 0 {
            0.0
        } else {
            (total_clicked as f64 / total_sent as f64 * 1000.0).round() / 10.0
        };
        Self {
            total_sent,
            total_clicked,
            click_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> ReviewRequest {
        ReviewRequest::new(
            "abc1234",
            ResolvedPlace::new("Joe's Pizza", "ChIJabc123"),
            "Sam",
            None,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn new_request_starts_sent() {
        let rr = request();
        assert_eq!(rr.status, ReviewStatus::Sent);
        assert!(rr.clicked_at.is_none());
    }

    #[test]
    fn first_click_marks_clicked() {
        let mut rr = request();
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        assert!(rr.record_click(at));
        assert_eq!(rr.status, ReviewStatus::Clicked);
        assert_eq!(rr.clicked_at, Some(at));
    }

    #[test]
    fn repeat_click_keeps_first_timestamp() {
        let mut rr = request();
        let first = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 5, 18, 0, 0).unwrap();
        rr.record_click(first);
        assert!(!rr.record_click(later));
        assert_eq!(rr.clicked_at, Some(first));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ReviewStatus::Clicked).unwrap(),
            serde_json::json!("clicked")
        );
    }

    #[test]
    fn click_rate_rounds_to_one_decimal() {
        let stats = ReviewStats::from_counts(3, 1);
        assert!((stats.click_rate - 33.3).abs() < f64::EPSILON);
        let stats = ReviewStats::from_counts(3, 2);
        assert!((stats.click_rate - 66.7).abs() < f64::EPSILON);
    }

    #[test]
    fn click_rate_is_zero_without_sends() {
        let stats = ReviewStats::from_counts(0, 0);
        assert_eq!(stats.total_sent, 0);
        assert!(stats.click_rate.abs() < f64::EPSILON);
    }
}
