//! # neotrack environment state
//!
//! This module defines [`NeoEnv`], the **shared network environment** used by every fetch in the
//! crate, and the [`HttpFetcher`] trait it is built on.
//!
//! ## Overview
//!
//! - [`ReqwestFetcher`] is the production fetcher: one pooled [`reqwest::Client`] with an explicit
//!   per-request timeout, turning non-2xx statuses into [`NeoError::HttpStatus`].
//! - Any other [`HttpFetcher`] (an in-memory stub in tests, a recording proxy, …) can be plugged
//!   in through [`NeoEnv::with_fetcher`].
//!
//! ## Structure
//!
//! ```text
//! NeoEnv
//! └── fetcher (Arc<dyn HttpFetcher>)
//!     └── ReqwestFetcher
//!         └── http_client (reqwest::Client, timeout)
//! ```
//!
//! `NeoEnv` is **cheaply cloneable**: clones share the same connection pool.
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::neo_errors::NeoError;

/// A source of HTTP GET responses.
#[async_trait]
pub trait HttpFetcher: Send + Sync + Debug {
    /// Perform a GET request and return the body of a successful response.
    ///
    /// Implementations must map non-success statuses to [`NeoError::HttpStatus`].
    async fn get_text(&self, url: &Url) -> Result<String, NeoError>;
}

/// [`HttpFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    http_client: Client,
}

impl ReqwestFetcher {
    /// Create a fetcher whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, NeoError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("neotrack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ReqwestFetcher { http_client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get_text(&self, url: &Url) -> Result<String, NeoError> {
        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NeoError::HttpStatus {
                status: status.as_u16(),
                url: redact_api_key(url),
            });
        }
        Ok(response.text().await?)
    }
}

/// Shared environment passed to every fetch.
#[derive(Debug, Clone)]
pub struct NeoEnv {
    fetcher: Arc<dyn HttpFetcher>,
}

impl NeoEnv {
    /// Create an environment talking to the network through [`ReqwestFetcher`].
    pub fn new(timeout: Duration) -> Result<Self, NeoError> {
        Ok(NeoEnv {
            fetcher: Arc::new(ReqwestFetcher::new(timeout)?),
        })
    }

    /// Create an environment around a custom fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn HttpFetcher>) -> Self {
        NeoEnv { fetcher }
    }

    pub(crate) async fn get_from_url(&self, url: &Url) -> Result<String, NeoError> {
        debug!(url = %redact_api_key(url), "GET");
        self.fetcher.get_text(url).await
    }
}

/// Render a URL with its `api_key` query value masked, for logs and error messages.
pub fn redact_api_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}
