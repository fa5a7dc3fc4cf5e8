//! # Hazard report
//!
//! A [`HazardReport`] is the outcome of one search: the hazardous identifiers found in the
//! feed, one [`ReportRow`] per successfully enriched asteroid, and a trace of what went wrong
//! for the others.
//!
//! ## Soft failure, made visible
//!
//! Failed lookups never abort a report: the asteroid is left out of `rows` and recorded in
//! `skipped`. A failed feed call yields an empty report whose [`FeedStatus`] is
//! [`FeedStatus::Failed`], so callers can tell "nothing hazardous" from "API unavailable".
//!
//! ## Rendering
//!
//! - [`HazardReport::table`] builds a [`comfy_table::Table`] in [`TableMode::Compact`]
//!   (the eight headline columns) or [`TableMode::Full`] (all fourteen columns).
//! - `Display` renders the compact table under a one-line summary.
//! - [`HazardReport::write_csv`] exports every column, with the same headers.
use std::fmt;
use std::io::Write;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};
use serde::Serialize;

use crate::constants::NeoId;
use crate::metrics::DerivedMetrics;
use crate::neo_errors::NeoError;
use crate::neo_feed::HazardousIds;
use crate::neo_lookup::AsteroidDetail;
use crate::time::DateRange;

const NOT_AVAILABLE: &str = "N/A";

/// One asteroid of a report: its detail and the metrics derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub detail: AsteroidDetail,
    pub metrics: DerivedMetrics,
}

/// Presentation form of a [`ReportRow`], every value already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Close Approach Date")]
    pub close_approach_date: String,
    #[serde(rename = "Danger")]
    pub danger: String,
    #[serde(rename = "Diameter (km)")]
    pub diameter_km: String,
    #[serde(rename = "Velocity (km/s)")]
    pub velocity_km_s: String,
    #[serde(rename = "Energy (Mt TNT)")]
    pub energy_mt: String,
    #[serde(rename = "Crater Diameter (km)")]
    pub crater_diameter_km: String,
    #[serde(rename = "Lunar Distance")]
    pub lunar_distance: String,
    #[serde(rename = "Orbital Period (days)")]
    pub orbital_period_days: String,
    #[serde(rename = "Eccentricity")]
    pub eccentricity: String,
    #[serde(rename = "Inclination (°)")]
    pub inclination_deg: String,
    #[serde(rename = "Orbit Type")]
    pub orbit_type: String,
    #[serde(rename = "Orbit Description")]
    pub orbit_description: String,
    #[serde(rename = "JPL Link")]
    pub jpl_link: String,
}

impl ReportRow {
    pub fn new(detail: AsteroidDetail, density_kg_m3: f64) -> Self {
        let metrics = DerivedMetrics::compute(
            detail.estimated_diameter_km,
            detail.relative_velocity_km_s,
            density_kg_m3,
        );
        ReportRow { detail, metrics }
    }

    /// Format every column.
    pub fn record(&self) -> ReportRecord {
        let d = &self.detail;
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        ReportRecord {
            name: d.name.clone(),
            close_approach_date: or_na(&d.close_approach_date),
            danger: "YES".to_string(),
            diameter_km: format!("{:.3}", d.estimated_diameter_km),
            velocity_km_s: format!("{:.2}", d.relative_velocity_km_s),
            energy_mt: format!("{:.2}", self.metrics.impact_energy_mt),
            crater_diameter_km: format!("{:.2}", self.metrics.crater_diameter_km),
            lunar_distance: format!("{:.2}", d.miss_distance_lunar),
            orbital_period_days: d
                .orbital_period_days
                .map(|p| format_thousands(p, 2))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            eccentricity: or_na(&d.eccentricity),
            inclination_deg: or_na(&d.inclination_deg),
            orbit_type: or_na(&d.orbit_class_type),
            orbit_description: or_na(&d.orbit_class_description),
            jpl_link: d.jpl_url(),
        }
    }
}

/// Format `value` with `decimals` fraction digits and `,` between thousands.
///
/// `1254.8452` with 2 decimals gives `"1,254.85"`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(fixed.len() + digits.len() / 3 + 1);
    if value.is_sign_negative() && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// State of the feed call behind a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Ok,
    /// The feed could not be fetched or parsed; the message is the underlying error.
    Failed(String),
}

/// An asteroid listed as hazardous whose detail could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAsteroid {
    pub id: NeoId,
    pub reason: String,
}

/// Column subsets available to [`HazardReport::table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    /// Name, date, diameter, velocity, energy, crater, lunar distance, orbit type.
    #[default]
    Compact,
    /// Every column of [`ReportRecord`].
    Full,
}

/// Hazardous asteroids approaching Earth within a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardReport {
    pub range: DateRange,
    /// Number of hazardous identifiers listed by the feed.
    pub total_hazardous: usize,
    /// Enriched asteroids, in feed order. Never longer than `total_hazardous`.
    pub rows: Vec<ReportRow>,
    pub skipped: Vec<SkippedAsteroid>,
    pub feed_status: FeedStatus,
}

impl HazardReport {
    /// Assemble a report from the feed result and the per-id lookup results.
    ///
    /// Arguments
    /// ---------
    /// * `range`: searched range
    /// * `hazardous`: identifiers returned by the feed
    /// * `lookups`: one lookup result per identifier, in feed order
    /// * `density_kg_m3`: density fed to the impact model
    pub fn assemble(
        range: DateRange,
        hazardous: &HazardousIds,
        lookups: Vec<(NeoId, Result<AsteroidDetail, NeoError>)>,
        density_kg_m3: f64,
    ) -> Self {
        let mut rows = Vec::with_capacity(lookups.len());
        let mut skipped = Vec::new();
        for (id, lookup) in lookups {
            match lookup {
                Ok(detail) => rows.push(ReportRow::new(detail, density_kg_m3)),
                Err(err) => skipped.push(SkippedAsteroid {
                    id,
                    reason: err.to_string(),
                }),
            }
        }
        HazardReport {
            range,
            total_hazardous: hazardous.total,
            rows,
            skipped,
            feed_status: FeedStatus::Ok,
        }
    }

    /// An empty report standing for a failed feed call.
    pub fn feed_failed(range: DateRange, err: &NeoError) -> Self {
        HazardReport {
            range,
            total_hazardous: 0,
            rows: Vec::new(),
            skipped: Vec::new(),
            feed_status: FeedStatus::Failed(err.to_string()),
        }
    }

    pub fn is_feed_ok(&self) -> bool {
        self.feed_status == FeedStatus::Ok
    }

    /// One-line human summary of the outcome.
    pub fn summary(&self) -> String {
        match &self.feed_status {
            FeedStatus::Failed(reason) => {
                format!("Could not retrieve the NeoWs feed for {}: {reason}", self.range)
            }
            FeedStatus::Ok if self.total_hazardous == 0 => {
                "No hazardous asteroid found in this period.".to_string()
            }
            FeedStatus::Ok => {
                let mut summary = format!(
                    "Found {} potentially hazardous asteroids!",
                    self.total_hazardous
                );
                if !self.skipped.is_empty() {
                    summary.push_str(&format!(
                        " ({} could not be detailed)",
                        self.skipped.len()
                    ));
                }
                summary
            }
        }
    }

    pub fn records(&self) -> Vec<ReportRecord> {
        self.rows.iter().map(ReportRow::record).collect()
    }

    /// Build a terminal table of the rows.
    pub fn table(&self, mode: TableMode) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let right = |s: String| Cell::new(s).set_alignment(CellAlignment::Right);
        match mode {
            TableMode::Compact => {
                table.set_header(vec![
                    Cell::new("Name"),
                    Cell::new("Close Approach"),
                    Cell::new("Diameter (km)"),
                    Cell::new("Velocity (km/s)"),
                    Cell::new("Energy (Mt TNT)"),
                    Cell::new("Crater (km)"),
                    Cell::new("Lunar Dist."),
                    Cell::new("Orbit"),
                ]);
                for r in self.records() {
                    table.add_row(Row::from(vec![
                        Cell::new(r.name),
                        Cell::new(r.close_approach_date),
                        right(r.diameter_km),
                        right(r.velocity_km_s),
                        right(r.energy_mt),
                        right(r.crater_diameter_km),
                        right(r.lunar_distance),
                        Cell::new(r.orbit_type),
                    ]));
                }
            }
            TableMode::Full => {
                table.set_header(REPORT_COLUMNS.iter().map(|h| Cell::new(*h)));
                for r in self.records() {
                    table.add_row(Row::from(vec![
                        Cell::new(r.name),
                        Cell::new(r.close_approach_date),
                        Cell::new(r.danger),
                        right(r.diameter_km),
                        right(r.velocity_km_s),
                        right(r.energy_mt),
                        right(r.crater_diameter_km),
                        right(r.lunar_distance),
                        right(r.orbital_period_days),
                        right(r.eccentricity),
                        right(r.inclination_deg),
                        Cell::new(r.orbit_type),
                        Cell::new(r.orbit_description),
                        Cell::new(r.jpl_link),
                    ]));
                }
            }
        }
        table
    }

    /// Write every row as CSV, headers included.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), NeoError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.rows.is_empty() {
            csv_writer.write_record(REPORT_COLUMNS)?;
        }
        for record in self.records() {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Column headers of the full report, in order.
pub const REPORT_COLUMNS: [&str; 14] = [
    "Name",
    "Close Approach Date",
    "Danger",
    "Diameter (km)",
    "Velocity (km/s)",
    "Energy (Mt TNT)",
    "Crater Diameter (km)",
    "Lunar Distance",
    "Orbital Period (days)",
    "Eccentricity",
    "Inclination (°)",
    "Orbit Type",
    "Orbit Description",
    "JPL Link",
];

impl fmt::Display for HazardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        if !self.rows.is_empty() {
            writeln!(f, "{}", self.table(TableMode::Compact))?;
        }
        for skipped in &self.skipped {
            writeln!(f, "  skipped {}: {}", skipped.id, skipped.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod report_test {
    use super::*;
    use crate::constants::{DENSITY_KG_M3, MAX_RANGE_DAYS};
    use crate::neo_lookup::neo_lookup_test::LOOKUP_3542519;
    use crate::neo_lookup::parse_lookup;

    fn range() -> DateRange {
        DateRange::parse("2025-10-04", "2025-10-06", MAX_RANGE_DAYS).unwrap()
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1254.8452003918, 2), "1,254.85");
        assert_eq!(format_thousands(999.994, 2), "999.99");
        assert_eq!(format_thousands(999.996, 2), "1,000.00");
        assert_eq!(format_thousands(1234567.0, 0), "1,234,567");
        assert_eq!(format_thousands(0.5, 2), "0.50");
        assert_eq!(format_thousands(-12345.678, 1), "-12,345.7");
        assert_eq!(format_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn test_record_formatting() {
        let detail = parse_lookup("3542519", LOOKUP_3542519).unwrap();
        let record = ReportRow::new(detail, DENSITY_KG_M3).record();
        assert_eq!(record.name, "(2010 PK9)");
        assert_eq!(record.close_approach_date, "2025-Oct-04");
        assert_eq!(record.danger, "YES");
        assert_eq!(record.diameter_km, "0.237");
        assert_eq!(record.velocity_km_s, "17.85");
        assert_eq!(record.lunar_distance, "18.47");
        assert_eq!(record.orbital_period_days, "1,254.85");
        assert_eq!(record.orbit_type, "APO");
        assert!(record.jpl_link.ends_with("sstr=3542519"));
    }

    #[test]
    fn test_assemble_skips_failed_lookups() {
        let detail = parse_lookup("3542519", LOOKUP_3542519).unwrap();
        let ids = HazardousIds::new(vec!["3542519".into(), "404".into()]);
        let report = HazardReport::assemble(
            range(),
            &ids,
            vec![
                ("3542519".into(), Ok(detail)),
                ("404".into(), Err(NeoError::MissingField("close_approach_data"))),
            ],
            DENSITY_KG_M3,
        );
        assert_eq!(report.total_hazardous, 2);
        assert_eq!(report.rows.len(), 1);
        assert!(report.rows.len() <= report.total_hazardous);
        assert_eq!(report.skipped[0].id, "404");
        assert!(report.is_feed_ok());
        assert!(report.summary().contains("Found 2"));
        assert!(report.summary().contains("1 could not be detailed"));
    }

    #[test]
    fn test_empty_and_failed_summaries_differ() {
        let empty = HazardReport::assemble(range(), &HazardousIds::default(), vec![], DENSITY_KG_M3);
        let failed = HazardReport::feed_failed(
            range(),
            &NeoError::HttpStatus {
                status: 503,
                url: "https://api.nasa.gov/neo/rest/v1/feed".into(),
            },
        );
        assert!(empty.rows.is_empty() && failed.rows.is_empty());
        assert_eq!(empty.summary(), "No hazardous asteroid found in this period.");
        assert!(failed.summary().contains("503"));
        assert!(!failed.is_feed_ok());
    }

    #[test]
    fn test_write_csv() {
        let detail = parse_lookup("3542519", LOOKUP_3542519).unwrap();
        let ids = HazardousIds::new(vec!["3542519".into()]);
        let report = HazardReport::assemble(
            range(),
            &ids,
            vec![("3542519".into(), Ok(detail))],
            DENSITY_KG_M3,
        );
        let mut buffer = Vec::new();
        report.write_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), REPORT_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("(2010 PK9),2025-Oct-04,YES,0.237,17.85,"));
        assert!(row.contains("\"1,254.85\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let report = HazardReport::assemble(range(), &HazardousIds::default(), vec![], DENSITY_KG_M3);
        let mut buffer = Vec::new();
        report.write_csv(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap().trim_end(),
            REPORT_COLUMNS.join(",")
        );
    }

    #[test]
    fn test_table_modes() {
        let detail = parse_lookup("3542519", LOOKUP_3542519).unwrap();
        let ids = HazardousIds::new(vec!["3542519".into()]);
        let report = HazardReport::assemble(
            range(),
            &ids,
            vec![("3542519".into(), Ok(detail))],
            DENSITY_KG_M3,
        );
        let mut compact = report.table(TableMode::Compact);
        let mut full = report.table(TableMode::Full);
        assert_eq!(compact.column_count(), 8);
        assert_eq!(full.column_count(), 14);
        assert!(report.to_string().contains("(2010 PK9)"));
    }
}
