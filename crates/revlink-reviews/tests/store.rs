//! Behaviour of `MemoryReviewStore` through the `ReviewStore` trait.

use chrono::{Duration, TimeZone, Utc};
use revlink_places::ResolvedPlace;
use revlink_reviews::{MemoryReviewStore, ReviewError, ReviewRequest, ReviewStatus, ReviewStore};

fn pizza() -> ResolvedPlace {
    ResolvedPlace::new("Joe's Pizza", "ChIJpizza")
}

fn diner() -> ResolvedPlace {
    ResolvedPlace::new("Pat's Diner", "ChIJdiner")
}

fn request(code: &str, place: ResolvedPlace, minutes: i64) -> ReviewRequest {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    ReviewRequest::new(code, place, "Sam", None, base + Duration::minutes(minutes))
}

#[tokio::test]
async fn duplicate_code_is_rejected() {
    let store = MemoryReviewStore::new();
    store.insert(request("aaaaaaa", pizza(), 0)).await.unwrap();

    let err = store
        .insert(request("aaaaaaa", diner(), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::DuplicateCode { ref code } if code == "aaaaaaa"));
}

#[tokio::test]
async fn click_on_unknown_code_is_none() {
    let store = MemoryReviewStore::new();
    let clicked = store.record_click("missing", Utc::now()).await.unwrap();
    assert!(clicked.is_none());
}

#[tokio::test]
async fn click_transitions_once() {
    let store = MemoryReviewStore::new();
    store.insert(request("abc1234", pizza(), 0)).await.unwrap();
    let first_at = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    let second_at = Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap();

    let first = store.record_click("abc1234", first_at).await.unwrap().unwrap();
    assert_eq!(first.status, ReviewStatus::Clicked);
    assert_eq!(first.clicked_at, Some(first_at));

    let second = store.record_click("abc1234", second_at).await.unwrap().unwrap();
    assert_eq!(second.clicked_at, Some(first_at));

    let stats = store.stats_for_place("ChIJpizza").await.unwrap();
    assert_eq!(stats.total_clicked, 1);
}

#[tokio::test]
async fn stats_are_scoped_to_place() {
    let store = MemoryReviewStore::new();
    store.insert(request("p000001", pizza(), 0)).await.unwrap();
    store.insert(request("p000002", pizza(), 1)).await.unwrap();
    store.insert(request("p000003", pizza(), 2)).await.unwrap();
    store.insert(request("d000001", diner(), 3)).await.unwrap();
    store.record_click("p000002", Utc::now()).await.unwrap();
    store.record_click("d000001", Utc::now()).await.unwrap();

    let stats = store.stats_for_place("ChIJpizza").await.unwrap();
    assert_eq!(stats.total_sent, 3);
    assert_eq!(stats.total_clicked, 1);
    assert!((stats.click_rate - 33.3).abs() < f64::EPSILON);

    let empty = store.stats_for_place("ChIJnobody").await.unwrap();
    assert_eq!(empty.total_sent, 0);
    assert!(empty.click_rate.abs() < f64::EPSILON);
}

#[tokio::test]
async fn recent_is_newest_first_and_limited() {
    let store = MemoryReviewStore::new();
    store.insert(request("p000001", pizza(), 0)).await.unwrap();
    store.insert(request("p000002", pizza(), 10)).await.unwrap();
    store.insert(request("p000003", pizza(), 5)).await.unwrap();
    store.insert(request("d000001", diner(), 20)).await.unwrap();

    let recent = store.recent_for_place("ChIJpizza", 2).await.unwrap();
    let codes: Vec<&str> = recent.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(codes, ["p000002", "p000003"]);
}
