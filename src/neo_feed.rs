//! # NeoWs feed: hazardous object retrieval
//!
//! One call to the NeoWs **feed** endpoint lists every near-Earth object with a close approach
//! inside a [`DateRange`]. The response groups objects per day:
//!
//! ```json
//! { "near_earth_objects": { "2025-10-04": [ { "id": "3542519",
//!                                             "is_potentially_hazardous_asteroid": true, … } ] } }
//! ```
//!
//! Only the identifier and the hazard flag are kept ([`NeoSummary`]); the hazardous ids are
//! returned in day order, then in the order the API lists them within a day.
use std::collections::BTreeMap;

use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::NeoConfig;
use crate::constants::NeoId;
use crate::env_state::NeoEnv;
use crate::neo_errors::NeoError;
use crate::time::DateRange;

/// The part of a feed entry the tracker cares about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NeoSummary {
    #[serde(default, deserialize_with = "id_from_text_or_number")]
    pub id: Option<NeoId>,
    /// `None` when the flag is absent or `null`; only `Some(true)` counts as hazardous.
    #[serde(rename = "is_potentially_hazardous_asteroid", default)]
    pub is_hazardous: Option<bool>,
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<Option<NeoId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    // Day keys are YYYY-MM-DD, so lexical order is chronological order
    #[serde(default)]
    near_earth_objects: BTreeMap<String, Vec<Value>>,
}

/// Hazardous identifiers found in a feed, with their count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HazardousIds {
    pub ids: Vec<NeoId>,
    pub total: usize,
}

impl HazardousIds {
    pub fn new(ids: Vec<NeoId>) -> Self {
        let total = ids.len();
        HazardousIds { ids, total }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Build the feed URL for a range.
///
/// Arguments
/// ---------
/// * `config`: provides the feed base URL and the API key
/// * `range`: the validated date range
///
/// Return
/// ------
/// * `<feed_url>?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD&api_key=<key>`
pub fn feed_url(config: &NeoConfig, range: &DateRange) -> Result<Url, NeoError> {
    Url::parse_with_params(
        &config.feed_url,
        &[
            ("start_date", range.start().to_string()),
            ("end_date", range.end().to_string()),
            ("api_key", config.api_key.clone()),
        ],
    )
    .map_err(|e| NeoError::InvalidUrl(format!("{}: {e}", config.feed_url)))
}

/// Parse a feed body into per-object summaries, flattened in day order.
///
/// An entry that does not fit [`NeoSummary`] is dropped on its own; the rest of the day
/// is kept.
pub fn parse_feed(body: &str) -> Result<Vec<NeoSummary>, NeoError> {
    let feed: FeedResponse = serde_json::from_str(body)?;
    Ok(feed
        .near_earth_objects
        .into_values()
        .flatten()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(summary) => Some(summary),
            Err(err) => {
                debug!(error = %err, "malformed feed entry dropped");
                None
            }
        })
        .collect())
}

/// Keep the identifiers of hazardous objects, preserving order.
///
/// Objects without an `id` cannot be looked up and are dropped.
pub fn hazardous_ids(summaries: &[NeoSummary]) -> HazardousIds {
    HazardousIds::new(
        summaries
            .iter()
            .filter(|neo| neo.is_hazardous == Some(true))
            .filter_map(|neo| neo.id.clone())
            .collect(),
    )
}

/// Fetch the feed for `range` and extract its hazardous identifiers.
///
/// This is the fallible form of the retrieval step; the fail-soft form lives on
/// [`NeoTrack::fetch_hazardous_ids`](crate::neotrack::NeoTrack::fetch_hazardous_ids).
pub async fn fetch_hazardous_ids(
    env: &NeoEnv,
    config: &NeoConfig,
    range: &DateRange,
) -> Result<HazardousIds, NeoError> {
    let url = feed_url(config, range)?;
    let body = env.get_from_url(&url).await?;
    let summaries = parse_feed(&body)?;
    let hazardous = hazardous_ids(&summaries);
    info!(
        %range,
        objects = summaries.len(),
        hazardous = hazardous.total,
        "feed retrieved"
    );
    Ok(hazardous)
}
