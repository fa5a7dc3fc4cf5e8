//! # Calendar dates and search ranges
//!
//! NeoWs and APOD both speak in plain calendar days (`YYYY-MM-DD`, UTC). This module wraps
//! them in [`NeoDate`] and [`DateRange`], and delegates calendar arithmetic to
//! [hifitime](https://docs.rs/hifitime) so that leap years and month lengths are handled once.
//!
//! A [`DateRange`] can only be built through [`DateRange::new`], which rejects reversed or
//! oversized ranges. Every network-facing function takes a `DateRange`, so an invalid range
//! never reaches the feed endpoint.
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use hifitime::Epoch;
use regex::Regex;

use crate::constants::MAX_RANGE_DAYS;
use crate::neo_errors::NeoError;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date regex"));

/// A UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoDate {
    year: i32,
    month: u8,
    day: u8,
}

impl NeoDate {
    /// Build a date from its calendar components.
    ///
    /// Arguments
    /// ---------
    /// * `year`, `month`, `day`: gregorian calendar components (month and day are 1-based)
    ///
    /// Return
    /// ------
    /// * The date, or [`NeoError::InvalidDate`] if the day does not exist (e.g. 2023-02-29)
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, NeoError> {
        Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0)
            .map_err(|_| NeoError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))?;
        Ok(NeoDate { year, month, day })
    }

    /// Build a date known to exist, such as a constant.
    pub(crate) const fn from_ymd_unchecked(year: i32, month: u8, day: u8) -> Self {
        NeoDate { year, month, day }
    }

    /// Today's date in UTC, read from the system clock.
    pub fn today() -> Result<Self, NeoError> {
        Ok(Self::from_epoch(Epoch::now()?))
    }

    fn from_epoch(epoch: Epoch) -> Self {
        let (year, month, day, _, _, _, _) = epoch.to_gregorian_utc();
        NeoDate { year, month, day }
    }

    /// Midnight UTC of this day.
    pub fn epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(self.year, self.month, self.day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Shift this date by a signed number of days.
    pub fn add_days(&self, days: i64) -> Self {
        // Shift in the UTC day count so leap seconds never push us onto 23:59:60
        Self::from_epoch(Epoch::from_mjd_utc(
            self.epoch().to_mjd_utc_days().round() + days as f64,
        ))
    }

    /// Signed number of whole days from `self` to `other`.
    pub fn days_until(&self, other: &NeoDate) -> i64 {
        (other.epoch().to_mjd_utc_days() - self.epoch().to_mjd_utc_days()).round() as i64
    }
}

impl FromStr for NeoDate {
    type Err = NeoError;

    /// Parse a strict `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = ISO_DATE
            .captures(trimmed)
            .ok_or_else(|| NeoError::InvalidDate(s.to_string()))?;

        let field = |idx: usize| caps.get(idx).map(|m| m.as_str()).unwrap_or_default();
        let year = field(1)
            .parse::<i32>()
            .map_err(|_| NeoError::InvalidDate(s.to_string()))?;
        let month = field(2)
            .parse::<u8>()
            .map_err(|_| NeoError::InvalidDate(s.to_string()))?;
        let day = field(3)
            .parse::<u8>()
            .map_err(|_| NeoError::InvalidDate(s.to_string()))?;

        NeoDate::from_ymd(year, month, day).map_err(|_| NeoError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for NeoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// An inclusive `[start, end]` range of days accepted by the NeoWs feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NeoDate,
    end: NeoDate,
}

impl DateRange {
    /// Validate and build a search range.
    ///
    /// Arguments
    /// ---------
    /// * `start`: first day of the range
    /// * `end`: last day of the range
    /// * `max_days`: largest admissible `end - start`, in days
    ///
    /// Return
    /// ------
    /// * The range, or [`NeoError::InvalidDateRange`] when `end < start`
    ///   or when the span exceeds `max_days`
    pub fn new(start: NeoDate, end: NeoDate, max_days: u32) -> Result<Self, NeoError> {
        let span = start.days_until(&end);
        if span < 0 {
            return Err(NeoError::InvalidDateRange(format!(
                "end date {end} is before start date {start}"
            )));
        }
        if span > i64::from(max_days) {
            return Err(NeoError::InvalidDateRange(format!(
                "{start} to {end} spans {span} days, at most {max_days} allowed"
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Parse both ends from `YYYY-MM-DD` strings, then validate as [`DateRange::new`].
    pub fn parse(start: &str, end: &str, max_days: u32) -> Result<Self, NeoError> {
        DateRange::new(start.parse()?, end.parse()?, max_days)
    }

    /// The default search window: today and the two following days.
    pub fn upcoming() -> Result<Self, NeoError> {
        let today = NeoDate::today()?;
        DateRange::new(today, today.add_days(2), MAX_RANGE_DAYS)
    }

    pub fn start(&self) -> NeoDate {
        self.start
    }

    pub fn end(&self) -> NeoDate {
        self.end
    }

    /// Number of days between `start` and `end` (0 for a single-day range).
    pub fn span_days(&self) -> i64 {
        self.start.days_until(&self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}
