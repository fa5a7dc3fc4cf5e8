//! # Astronomy Picture of the Day
//!
//! Thin client for `GET <apod_url>?api_key=<key>[&date=YYYY-MM-DD]`. The archive starts on
//! 1995-06-16 and has no future entries; [`validate_apod_date`] enforces both bounds before
//! any request is made.
use reqwest::Url;
use serde::Deserialize;

use crate::config::NeoConfig;
use crate::constants::APOD_FIRST_DATE;
use crate::env_state::NeoEnv;
use crate::neo_errors::NeoError;
use crate::time::NeoDate;

/// Whether an APOD entry is a still image or an embedded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
}

/// One APOD entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ApodEntry {
    pub date: Option<String>,
    pub title: String,
    pub explanation: String,
    /// High-definition URL when available, standard URL otherwise.
    pub url: String,
    pub media_type: MediaType,
}

#[derive(Debug, Deserialize)]
struct ApodResponse {
    date: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    explanation: String,
    hdurl: Option<String>,
    url: Option<String>,
}

/// First day of the APOD archive.
pub fn apod_first_date() -> NeoDate {
    let (year, month, day) = APOD_FIRST_DATE;
    NeoDate::from_ymd_unchecked(year, month, day)
}

/// Check that `date` lies within `[1995-06-16, today]`.
pub fn validate_apod_date(date: NeoDate, today: NeoDate) -> Result<NeoDate, NeoError> {
    let first = apod_first_date();
    if date < first {
        return Err(NeoError::InvalidDate(format!(
            "{date} is before the first APOD ({first})"
        )));
    }
    if date > today {
        return Err(NeoError::InvalidDate(format!(
            "{date} is in the future (today is {today})"
        )));
    }
    Ok(date)
}

/// Build the APOD URL, for today's picture when `date` is `None`.
pub fn apod_url(config: &NeoConfig, date: Option<NeoDate>) -> Result<Url, NeoError> {
    let mut params = vec![("api_key", config.api_key.clone())];
    if let Some(date) = date {
        params.push(("date", date.to_string()));
    }
    Url::parse_with_params(&config.apod_url, &params)
        .map_err(|e| NeoError::InvalidUrl(format!("{}: {e}", config.apod_url)))
}

/// Parse an APOD body.
///
/// Fails with [`NeoError::MissingField`] when the entry carries neither `hdurl` nor `url`.
pub fn parse_apod(body: &str) -> Result<ApodEntry, NeoError> {
    let apod: ApodResponse = serde_json::from_str(body)?;
    let url = apod
        .hdurl
        .or(apod.url)
        .ok_or(NeoError::MissingField("hdurl|url"))?;
    let media_type = if url.contains("youtube") || url.contains("vimeo") {
        MediaType::Video
    } else {
        MediaType::Image
    };
    Ok(ApodEntry {
        date: apod.date,
        title: apod.title,
        explanation: apod.explanation,
        url,
        media_type,
    })
}

pub async fn fetch_apod(
    env: &NeoEnv,
    config: &NeoConfig,
    date: Option<NeoDate>,
) -> Result<ApodEntry, NeoError> {
    let url = apod_url(config, date)?;
    let body = env.get_from_url(&url).await?;
    parse_apod(&body)
}
