#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Url;

use neotrack::env_state::{redact_api_key, HttpFetcher, NeoEnv};
use neotrack::neo_errors::NeoError;
use neotrack::report::ReportRow;
use neotrack::{NeoConfig, NeoTrack};

/// Canned answer of the mock fetcher.
#[derive(Debug, Clone)]
pub enum Canned {
    Body(String),
    Status(u16),
}

#[derive(Debug, Clone)]
struct Route {
    answer: Canned,
    delay: Duration,
}

/// In-memory [`HttpFetcher`] routing on the last path segment of the URL
/// (`feed`, `apod` or an asteroid id) and recording every call.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<Url>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, segment: &str, answer: Canned) {
        self.route_delayed(segment, answer, Duration::ZERO);
    }

    pub fn route_delayed(&self, segment: &str, answer: Canned, delay: Duration) {
        self.routes
            .lock()
            .insert(segment.to_string(), Route { answer, delay });
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().clone()
    }

    /// Number of calls whose last path segment is `segment`.
    pub fn calls_to(&self, segment: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|url| last_segment(url) == segment)
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

fn last_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl HttpFetcher for MockFetcher {
    async fn get_text(&self, url: &Url) -> Result<String, NeoError> {
        self.calls.lock().push(url.clone());
        let route = self.routes.lock().get(&last_segment(url)).cloned();

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(route) = &route {
            tokio::time::sleep(route.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match route.map(|r| r.answer) {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(NeoError::HttpStatus {
                status,
                url: redact_api_key(url),
            }),
            None => Err(NeoError::HttpStatus {
                status: 404,
                url: redact_api_key(url),
            }),
        }
    }
}

/// Tracker wired to `fetcher`, with default endpoints and the given configuration.
pub fn tracker_with(fetcher: &Arc<MockFetcher>, config: NeoConfig) -> NeoTrack {
    let fetcher: Arc<dyn HttpFetcher> = fetcher.clone();
    NeoTrack::with_env(NeoEnv::with_fetcher(fetcher), config)
}

/// Feed body listing `(id, hazardous)` pairs under the given day.
pub fn feed_body(days: &[(&str, &[(&str, bool)])]) -> String {
    let days: serde_json::Map<String, serde_json::Value> = days
        .iter()
        .map(|(day, neos)| {
            let neos = neos
                .iter()
                .map(|(id, hazardous)| {
                    serde_json::json!({
                        "id": id,
                        "is_potentially_hazardous_asteroid": hazardous
                    })
                })
                .collect();
            (day.to_string(), serde_json::Value::Array(neos))
        })
        .collect();
    serde_json::json!({ "near_earth_objects": days }).to_string()
}

/// Lookup body for one object.
pub fn lookup_body(name: &str, diameter_km: f64, velocity_km_s: &str, lunar: &str) -> String {
    serde_json::json!({
        "name": name,
        "estimated_diameter": {"kilometers": {"estimated_diameter_max": diameter_km}},
        "close_approach_data": [{
            "close_approach_date": "2025-10-04",
            "close_approach_date_full": "2025-Oct-04 12:31",
            "relative_velocity": {"kilometers_per_second": velocity_km_s},
            "miss_distance": {"lunar": lunar}
        }],
        "orbital_data": {
            "orbital_period": "365.25",
            "eccentricity": "0.2",
            "inclination": "3.1",
            "orbit_class": {"orbit_class_type": "APO", "orbit_class_description": "Apollo"}
        }
    })
    .to_string()
}

pub fn assert_row_metrics(row: &ReportRow, energy_mt: f64, crater_km: f64, epsilon: f64) {
    assert_relative_eq!(
        row.metrics.impact_energy_mt,
        energy_mt,
        max_relative = epsilon
    );
    assert_relative_eq!(
        row.metrics.crater_diameter_km,
        crater_km,
        max_relative = epsilon
    );
}
