//! # Runtime configuration
//!
//! [`NeoConfig`] gathers every tunable of the crate: the NASA API key, the three endpoint
//! base URLs, the asteroid density fed to the impact model, network timeout, cache lifetimes,
//! lookup fan-out and the maximum search span.
//!
//! A configuration can be obtained three ways:
//!
//! - [`NeoConfig::default`] – public `DEMO_KEY` and the production NASA endpoints,
//! - [`NeoConfig::builder`] – fluent overrides, validated by [`NeoConfigBuilder::build`],
//! - [`NeoConfig::from_toml_str`] / [`NeoConfig::from_file`] – a TOML document where every
//!   key is optional and missing keys fall back to the defaults.
//!
//! ## Example
//!
//! ```rust,no_run
//! use neotrack::config::NeoConfig;
//!
//! let config = NeoConfig::builder()
//!     .api_key("my-key")
//!     .max_concurrent_lookups(8)
//!     .report_ttl_secs(600)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ```toml
//! api_key = "my-key"
//! request_timeout_secs = 5
//! density_kg_m3 = 2600.0
//! ```
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::constants::{
    APOD_URL, DEMO_API_KEY, DENSITY_KG_M3, FEED_URL, LOOKUP_URL, MAX_RANGE_DAYS,
};
use crate::neo_errors::NeoError;

/// Environment variable overriding [`NeoConfig::api_key`].
pub const API_KEY_ENV: &str = "NASA_API_KEY";

/// Configuration of a [`NeoTrack`](crate::neotrack::NeoTrack) context.
///
/// Defaults
/// --------
/// * `api_key`: `"DEMO_KEY"`
/// * `feed_url`, `lookup_url`, `apod_url`: the api.nasa.gov endpoints
/// * `density_kg_m3`: 3000.0
/// * `request_timeout_secs`: 10
/// * `report_ttl_secs`: 3600 (1 h)
/// * `apod_ttl_secs`: 86400 (24 h)
/// * `max_concurrent_lookups`: 4 (1 means strictly sequential lookups)
/// * `max_range_days`: 7
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeoConfig {
    pub api_key: String,
    pub feed_url: String,
    pub lookup_url: String,
    pub apod_url: String,
    /// Bulk density used by the impact energy model (kg/m³).
    pub density_kg_m3: f64,
    pub request_timeout_secs: u64,
    pub report_ttl_secs: u64,
    pub apod_ttl_secs: u64,
    /// Upper bound on in-flight lookup requests while enriching a report.
    pub max_concurrent_lookups: usize,
    pub max_range_days: u32,
}

impl Default for NeoConfig {
    fn default() -> Self {
        NeoConfig {
            api_key: DEMO_API_KEY.to_string(),
            feed_url: FEED_URL.to_string(),
            lookup_url: LOOKUP_URL.to_string(),
            apod_url: APOD_URL.to_string(),
            density_kg_m3: DENSITY_KG_M3,
            request_timeout_secs: 10,
            report_ttl_secs: 3600,
            apod_ttl_secs: 3600 * 24,
            max_concurrent_lookups: 4,
            max_range_days: MAX_RANGE_DAYS,
        }
    }
}

impl NeoConfig {
    pub fn builder() -> NeoConfigBuilder {
        NeoConfigBuilder::new()
    }

    /// Parse a TOML document, then validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, NeoError> {
        let config: NeoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NeoError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Replace the API key with the value of `NASA_API_KEY` when it is set and non-empty.
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = key.trim().to_string();
            }
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn report_ttl(&self) -> Duration {
        Duration::from_secs(self.report_ttl_secs)
    }

    pub fn apod_ttl(&self) -> Duration {
        Duration::from_secs(self.apod_ttl_secs)
    }

    /// Check the invariants listed on [`NeoConfigBuilder::build`].
    pub fn validate(&self) -> Result<(), NeoError> {
        if self.api_key.trim().is_empty() {
            return Err(NeoError::InvalidConfig("api_key must not be empty".into()));
        }
        for (name, url) in [
            ("feed_url", &self.feed_url),
            ("lookup_url", &self.lookup_url),
            ("apod_url", &self.apod_url),
        ] {
            Url::parse(url)
                .map_err(|e| NeoError::InvalidConfig(format!("{name} {url:?}: {e}")))?;
        }
        if !(self.density_kg_m3.is_finite() && self.density_kg_m3 > 0.0) {
            return Err(NeoError::InvalidConfig(format!(
                "density_kg_m3 must be positive, got {}",
                self.density_kg_m3
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(NeoError::InvalidConfig(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.report_ttl_secs == 0 || self.apod_ttl_secs == 0 {
            return Err(NeoError::InvalidConfig(
                "cache lifetimes must be at least 1 second".into(),
            ));
        }
        if self.max_concurrent_lookups == 0 {
            return Err(NeoError::InvalidConfig(
                "max_concurrent_lookups must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`NeoConfig`], with validation.
#[derive(Debug, Clone, Default)]
pub struct NeoConfigBuilder {
    config: NeoConfig,
}

impl NeoConfigBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            config: NeoConfig::default(),
        }
    }

    pub fn api_key(mut self, v: impl Into<String>) -> Self {
        self.config.api_key = v.into();
        self
    }
    pub fn feed_url(mut self, v: impl Into<String>) -> Self {
        self.config.feed_url = v.into();
        self
    }
    pub fn lookup_url(mut self, v: impl Into<String>) -> Self {
        self.config.lookup_url = v.into();
        self
    }
    pub fn apod_url(mut self, v: impl Into<String>) -> Self {
        self.config.apod_url = v.into();
        self
    }
    pub fn density_kg_m3(mut self, v: f64) -> Self {
        self.config.density_kg_m3 = v;
        self
    }
    pub fn request_timeout_secs(mut self, v: u64) -> Self {
        self.config.request_timeout_secs = v;
        self
    }
    pub fn report_ttl_secs(mut self, v: u64) -> Self {
        self.config.report_ttl_secs = v;
        self
    }
    pub fn apod_ttl_secs(mut self, v: u64) -> Self {
        self.config.apod_ttl_secs = v;
        self
    }
    pub fn max_concurrent_lookups(mut self, v: usize) -> Self {
        self.config.max_concurrent_lookups = v;
        self
    }
    pub fn max_range_days(mut self, v: u32) -> Self {
        self.config.max_range_days = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// ----------------
    /// * `api_key` is not blank
    /// * the three endpoint URLs parse as absolute URLs
    /// * `density_kg_m3 > 0` and finite
    /// * `request_timeout_secs ≥ 1`, `report_ttl_secs ≥ 1`, `apod_ttl_secs ≥ 1`
    /// * `max_concurrent_lookups ≥ 1`
    pub fn build(self) -> Result<NeoConfig, NeoError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
