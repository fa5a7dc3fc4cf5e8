mod common;

use common::{tracker_with, Canned, MockFetcher};
use neotrack::apod::MediaType;
use neotrack::{NeoConfig, NeoDate};

const APOD_BODY: &str = r#"{
    "date": "2024-04-08",
    "title": "Totality",
    "explanation": "The Moon covers the Sun.",
    "url": "https://apod.nasa.gov/apod/image/2404/small.jpg",
    "hdurl": "https://apod.nasa.gov/apod/image/2404/large.jpg",
    "media_type": "image"
}"#;

#[tokio::test]
async fn test_apod_is_cached_per_day() {
    let fetcher = MockFetcher::new();
    fetcher.route("apod", Canned::Body(APOD_BODY.to_string()));
    let tracker = tracker_with(&fetcher, NeoConfig::default());
    let date = NeoDate::from_ymd(2024, 4, 8).ok();

    let entry = tracker.try_fetch_apod(date).await.unwrap();
    assert_eq!(entry.title, "Totality");
    assert_eq!(entry.media_type, MediaType::Image);
    assert_eq!(entry.url, "https://apod.nasa.gov/apod/image/2404/large.jpg");

    assert_eq!(tracker.fetch_apod(date).await, Some(entry));
    assert_eq!(fetcher.calls_to("apod"), 1);
    let query: Vec<(String, String)> = fetcher.calls()[0].query_pairs().into_owned().collect();
    assert!(query.contains(&("date".into(), "2024-04-08".into())));

    let other_day = NeoDate::from_ymd(2024, 4, 9).ok();
    tracker.fetch_apod(other_day).await;
    assert_eq!(fetcher.calls_to("apod"), 2);
}

#[tokio::test]
async fn test_apod_dates_out_of_archive() {
    let fetcher = MockFetcher::new();
    fetcher.route("apod", Canned::Body(APOD_BODY.to_string()));
    let tracker = tracker_with(&fetcher, NeoConfig::default());

    let before = NeoDate::from_ymd(1995, 6, 15).ok();
    assert!(tracker.try_fetch_apod(before).await.is_err());

    let tomorrow = NeoDate::today().unwrap().add_days(1);
    assert_eq!(tracker.fetch_apod(Some(tomorrow)).await, None);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_apod_failure_is_soft() {
    let fetcher = MockFetcher::new();
    fetcher.route("apod", Canned::Status(429));
    let tracker = tracker_with(&fetcher, NeoConfig::default());

    let date = NeoDate::from_ymd(2020, 1, 1).ok();
    assert_eq!(tracker.fetch_apod(date).await, None);

    fetcher.route("apod", Canned::Body(APOD_BODY.to_string()));
    assert!(tracker.fetch_apod(date).await.is_some());
    assert_eq!(fetcher.calls_to("apod"), 2);
}

#[tokio::test]
async fn test_current_apod_sends_no_date() {
    let fetcher = MockFetcher::new();
    fetcher.route("apod", Canned::Body(APOD_BODY.to_string()));
    let tracker = tracker_with(&fetcher, NeoConfig::default());

    let entry = tracker.try_fetch_apod(None).await.unwrap();
    assert_eq!(entry.title, "Totality");

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].query_pairs().all(|(key, _)| key != "date"));

    assert_eq!(tracker.fetch_apod(None).await, Some(entry));
    assert_eq!(fetcher.calls_to("apod"), 1);
}
