//! # NeoTrack: the tracker context
//!
//! This module defines [`NeoTrack`], the façade that wires together:
//!
//! 1. **Environment state** ([`NeoEnv`]) – the HTTP fetcher shared by every request.
//! 2. **Configuration** ([`NeoConfig`]) – API key, endpoints, density, limits.
//! 3. **Caches** – hazard reports keyed by [`DateRange`] (1 h by default) and APOD entries
//!    keyed by requested day, `None` for the current one (24 h by default).
//!
//! ## Pipeline
//!
//! ```text
//! DateRange ──feed──▶ HazardousIds ──lookup × N (bounded fan-out)──▶ AsteroidDetail
//!                                                                       │ metrics
//!                                                                       ▼
//!                                                                 HazardReport (cached)
//! ```
//!
//! Every network step exists in two forms:
//!
//! - `try_*` returns the typed [`NeoError`],
//! - the plain form is **fail-soft**: it logs the error and returns an empty or absent value.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use neotrack::config::NeoConfig;
//! use neotrack::neotrack::NeoTrack;
//! use neotrack::time::DateRange;
//!
//! # async fn run() -> Result<(), neotrack::neo_errors::NeoError> {
//! let tracker = NeoTrack::new(NeoConfig::default().with_env_api_key())?;
//! let range = DateRange::parse("2025-10-04", "2025-10-06", tracker.config().max_range_days)?;
//!
//! let report = tracker.search(&range).await;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::apod::{self, validate_apod_date, ApodEntry};
use crate::cache::TtlCache;
use crate::config::NeoConfig;
use crate::constants::NeoId;
use crate::env_state::NeoEnv;
use crate::metrics::{ImpactScenario, SimulationOutcome};
use crate::neo_errors::NeoError;
use crate::neo_feed::{self, HazardousIds};
use crate::neo_lookup::{self, AsteroidDetail};
use crate::report::HazardReport;
use crate::time::{DateRange, NeoDate};

/// Where the user stands in the search workflow.
///
/// The caller owns this value and hands it to [`NeoTrack::report_for`]; the tracker keeps no
/// notion of a "current search" of its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// No search submitted yet.
    #[default]
    Idle,
    /// A valid range was submitted.
    Ready(DateRange),
    /// The submitted range was rejected; the message explains why.
    Rejected(String),
}

impl SearchState {
    /// Validate a submitted range. No network call is made.
    pub fn submit(start: NeoDate, end: NeoDate, max_days: u32) -> Self {
        match DateRange::new(start, end, max_days) {
            Ok(range) => SearchState::Ready(range),
            Err(err) => SearchState::Rejected(err.to_string()),
        }
    }

    pub fn range(&self) -> Option<&DateRange> {
        match self {
            SearchState::Ready(range) => Some(range),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct NeoTrack {
    env: NeoEnv,
    config: NeoConfig,
    reports: TtlCache<DateRange, Arc<HazardReport>>,
    apods: TtlCache<Option<NeoDate>, ApodEntry>,
}

impl NeoTrack {
    /// Construct a tracker talking to the real NASA endpoints.
    ///
    /// Arguments
    /// ---------
    /// * `config`: validated before use
    ///
    /// Return
    /// ------
    /// * The tracker, or an error if the configuration is invalid or the HTTP client
    ///   cannot be built
    pub fn new(config: NeoConfig) -> Result<Self, NeoError> {
        config.validate()?;
        let env = NeoEnv::new(config.request_timeout())?;
        Ok(Self::with_env(env, config))
    }

    /// Construct a tracker over an existing environment (custom fetcher, shared pool…).
    pub fn with_env(env: NeoEnv, config: NeoConfig) -> Self {
        NeoTrack {
            reports: TtlCache::new(config.report_ttl()),
            apods: TtlCache::new(config.apod_ttl()),
            env,
            config,
        }
    }

    pub fn config(&self) -> &NeoConfig {
        &self.config
    }

    // ---------------------------------------------------------------------------------------------
    // Feed retrieval
    // ---------------------------------------------------------------------------------------------

    pub async fn try_fetch_hazardous_ids(
        &self,
        range: &DateRange,
    ) -> Result<HazardousIds, NeoError> {
        neo_feed::fetch_hazardous_ids(&self.env, &self.config, range).await
    }

    /// Hazardous identifiers for `range`; empty when the feed cannot be retrieved.
    pub async fn fetch_hazardous_ids(&self, range: &DateRange) -> HazardousIds {
        self.try_fetch_hazardous_ids(range)
            .await
            .unwrap_or_else(|err| {
                warn!(%range, error = %err, "feed retrieval failed");
                HazardousIds::default()
            })
    }

    // ---------------------------------------------------------------------------------------------
    // Detail enrichment
    // ---------------------------------------------------------------------------------------------

    pub async fn try_fetch_detail(&self, id: &str) -> Result<AsteroidDetail, NeoError> {
        neo_lookup::fetch_detail(&self.env, &self.config, id).await
    }

    /// Detail of one object; `None` when the lookup fails or lacks a required field.
    pub async fn fetch_detail(&self, id: &str) -> Option<AsteroidDetail> {
        match self.try_fetch_detail(id).await {
            Ok(detail) => Some(detail),
            Err(err) => {
                warn!(id, error = %err, "asteroid lookup skipped");
                None
            }
        }
    }

    /// Look up every id with at most `max_concurrent_lookups` requests in flight.
    ///
    /// Results come back in the order of `ids`.
    async fn lookup_all(&self, ids: &[NeoId]) -> Vec<(NeoId, Result<AsteroidDetail, NeoError>)> {
        stream::iter(ids.iter().cloned())
            .map(|id| async move {
                let lookup = self.try_fetch_detail(&id).await;
                if let Err(err) = &lookup {
                    warn!(id = %id, error = %err, "asteroid lookup skipped");
                }
                (id, lookup)
            })
            .buffered(self.config.max_concurrent_lookups)
            .collect()
            .await
    }

    // ---------------------------------------------------------------------------------------------
    // Aggregation
    // ---------------------------------------------------------------------------------------------

    /// Build the hazard report for `range` without touching the cache.
    async fn compute_report(&self, range: &DateRange) -> HazardReport {
        let hazardous = match self.try_fetch_hazardous_ids(range).await {
            Ok(hazardous) => hazardous,
            Err(err) => {
                warn!(%range, error = %err, "feed retrieval failed");
                return HazardReport::feed_failed(*range, &err);
            }
        };

        let lookups = if hazardous.is_empty() {
            Vec::new()
        } else {
            self.lookup_all(&hazardous.ids).await
        };

        let report =
            HazardReport::assemble(*range, &hazardous, lookups, self.config.density_kg_m3);
        info!(
            %range,
            hazardous = report.total_hazardous,
            rows = report.rows.len(),
            skipped = report.skipped.len(),
            "hazard report built"
        );
        report
    }

    /// Hazard report for `range`, served from the cache when a fresh one exists.
    ///
    /// Reports whose feed call failed are returned but not cached, so the next call retries.
    pub async fn build_hazard_report(&self, range: &DateRange) -> Arc<HazardReport> {
        if let Some(report) = self.reports.get(range) {
            debug!(%range, "hazard report served from cache");
            return report;
        }

        let report = Arc::new(self.compute_report(range).await);
        if report.is_feed_ok() {
            self.reports.insert(*range, Arc::clone(&report));
        }
        report
    }

    /// A fresh user search: drop every cached report, then build the one for `range`.
    pub async fn search(&self, range: &DateRange) -> Arc<HazardReport> {
        self.clear_cache();
        self.build_hazard_report(range).await
    }

    /// Validate a submitted range and, when valid, invalidate the cached reports.
    pub fn submit_search(&self, start: NeoDate, end: NeoDate) -> SearchState {
        let state = SearchState::submit(start, end, self.config.max_range_days);
        match &state {
            SearchState::Ready(range) => {
                info!(%range, "search submitted");
                self.clear_cache();
            }
            SearchState::Rejected(reason) => warn!(%reason, "search rejected"),
            SearchState::Idle => {}
        }
        state
    }

    /// Report matching a search state; `None` until a valid range has been submitted.
    pub async fn report_for(&self, state: &SearchState) -> Option<Arc<HazardReport>> {
        match state.range() {
            Some(range) => Some(self.build_hazard_report(range).await),
            None => None,
        }
    }

    /// Drop every cached report and APOD entry.
    pub fn clear_cache(&self) {
        self.reports.clear();
        self.apods.clear();
    }

    // ---------------------------------------------------------------------------------------------
    // Simulation
    // ---------------------------------------------------------------------------------------------

    /// Run a what-if scenario with the configured density. No network access.
    pub fn simulate(&self, scenario: &ImpactScenario) -> SimulationOutcome {
        scenario.simulate(self.config.density_kg_m3)
    }

    // ---------------------------------------------------------------------------------------------
    // Astronomy Picture of the Day
    // ---------------------------------------------------------------------------------------------

    /// APOD for `date`, validated and cached per requested day.
    ///
    /// With `None` the request carries no date, so NASA picks its own current entry; the
    /// archive rolls over on US Eastern time, not UTC.
    pub async fn try_fetch_apod(&self, date: Option<NeoDate>) -> Result<ApodEntry, NeoError> {
        if let Some(date) = date {
            validate_apod_date(date, NeoDate::today()?)?;
        }

        if let Some(entry) = self.apods.get(&date) {
            debug!(?date, "APOD served from cache");
            return Ok(entry);
        }

        let entry = apod::fetch_apod(&self.env, &self.config, date).await?;
        self.apods.insert(date, entry.clone());
        Ok(entry)
    }

    /// APOD for `date`; `None` when the date is out of range or the request fails.
    pub async fn fetch_apod(&self, date: Option<NeoDate>) -> Option<ApodEntry> {
        match self.try_fetch_apod(date).await {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "APOD unavailable");
                None
            }
        }
    }
}
