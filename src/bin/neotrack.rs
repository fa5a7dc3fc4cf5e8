//! neotrack command-line interface
//!
//! Run with: cargo run --bin neotrack -- report --start 2025-10-04 --end 2025-10-06

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neotrack::apod::MediaType;
use neotrack::config::API_KEY_ENV;
use neotrack::constants::{DEMO_API_KEY, ORBIT_PATH_SAMPLES};
use neotrack::metrics::ImpactScenario;
use neotrack::orbit_path::orbit_path;
use neotrack::report::format_thousands;
use neotrack::{DateRange, NeoConfig, NeoDate, NeoTrack, SearchState, TableMode};

/// Potentially hazardous asteroid tracker.
#[derive(Parser, Debug)]
#[command(name = "neotrack", version, about)]
struct Cli {
    /// TOML configuration file. `NASA_API_KEY` overrides its `api_key`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List hazardous asteroids approaching Earth between two dates.
    Report {
        /// First day (YYYY-MM-DD), defaults to today.
        #[arg(long)]
        start: Option<NeoDate>,
        /// Last day (YYYY-MM-DD), defaults to two days after the start.
        #[arg(long)]
        end: Option<NeoDate>,
        /// Also write every column to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Show every column in the terminal table.
        #[arg(long)]
        full: bool,
    },
    /// Evaluate a hypothetical impact and its deflection.
    Simulate {
        /// Diameter in km.
        #[arg(long, default_value_t = 0.5)]
        diameter: f64,
        /// Velocity in km/s.
        #[arg(long, default_value_t = 15.0)]
        velocity: f64,
        /// Velocity change applied by the deflection, in m/s.
        #[arg(long, default_value_t = 1.0)]
        delta_v: f64,
    },
    /// Show the Astronomy Picture of the Day.
    Apod {
        /// Day to show (YYYY-MM-DD), defaults to today.
        #[arg(long)]
        date: Option<NeoDate>,
    },
    /// Print the demonstration orbit curve as CSV (x,y,z in AU).
    Orbit {
        #[arg(long, default_value_t = ORBIT_PATH_SAMPLES)]
        samples: usize,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<NeoConfig> {
    let config = match path {
        Some(path) => NeoConfig::from_file(path)
            .with_context(|| format!("cannot load configuration from {}", path.display()))?,
        None => NeoConfig::default(),
    };
    Ok(config.with_env_api_key())
}

async fn run_report(
    tracker: &NeoTrack,
    start: Option<NeoDate>,
    end: Option<NeoDate>,
    csv: Option<PathBuf>,
    full: bool,
) -> anyhow::Result<()> {
    let (start, end) = match (start, end) {
        (None, None) => {
            let upcoming = DateRange::upcoming()?;
            (upcoming.start(), upcoming.end())
        }
        (Some(start), end) => (start, end.unwrap_or(start.add_days(2))),
        (None, Some(end)) => (NeoDate::today()?, end),
    };

    let state = tracker.submit_search(start, end);
    if let SearchState::Rejected(reason) = &state {
        bail!("invalid date range: {reason}");
    }
    let Some(report) = tracker.report_for(&state).await else {
        bail!("no search submitted");
    };

    if !report.is_feed_ok() {
        bail!("{}", report.summary());
    }

    println!("{}", report.summary());
    if !report.rows.is_empty() {
        let mode = if full { TableMode::Full } else { TableMode::Compact };
        println!("{}", report.table(mode));
    }
    for skipped in &report.skipped {
        tracing::warn!(id = %skipped.id, reason = %skipped.reason, "not included in the report");
    }

    if let Some(path) = csv {
        let file = File::create(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        report.write_csv(file)?;
        tracing::info!(path = %path.display(), rows = report.rows.len(), "CSV written");
    }
    Ok(())
}

fn run_simulate(
    tracker: &NeoTrack,
    diameter: f64,
    velocity: f64,
    delta_v: f64,
) -> anyhow::Result<()> {
    let scenario = ImpactScenario::new(diameter, velocity, delta_v)?;
    let outcome = tracker.simulate(&scenario);

    println!(
        "Impactor: {} km at {} km/s",
        scenario.diameter_km, scenario.velocity_km_s
    );
    println!(
        "Impact energy: {} Mt TNT",
        format_thousands(outcome.impact_energy_mt, 2)
    );
    println!(
        "Crater diameter: {} km",
        format_thousands(outcome.crater_diameter_km, 2)
    );
    println!(
        "Deflection after Δv = {} m/s: {} km",
        scenario.delta_v_m_s,
        format_thousands(outcome.deflection_km, 0)
    );
    Ok(())
}

async fn run_apod(tracker: &NeoTrack, date: Option<NeoDate>) -> anyhow::Result<()> {
    let entry = tracker.try_fetch_apod(date).await?;
    println!("{}", entry.title);
    if let Some(date) = &entry.date {
        println!("{date}");
    }
    let kind = match entry.media_type {
        MediaType::Image => "image",
        MediaType::Video => "video",
    };
    println!("{kind}: {}", entry.url);
    println!();
    println!("{}", entry.explanation);
    Ok(())
}

fn run_orbit(samples: usize) {
    println!("x,y,z");
    for point in orbit_path(samples) {
        println!("{}", point.iter().map(|c| format!("{c:.6}")).join(","));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neotrack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let tracker = NeoTrack::new(config)?;
    if tracker.config().api_key == DEMO_API_KEY {
        tracing::warn!(
            "using the rate-limited {DEMO_API_KEY}, set {API_KEY_ENV} for a personal key"
        );
    }

    match cli.command {
        Command::Report {
            start,
            end,
            csv,
            full,
        } => run_report(&tracker, start, end, csv, full).await,
        Command::Simulate {
            diameter,
            velocity,
            delta_v,
        } => run_simulate(&tracker, diameter, velocity, delta_v),
        Command::Apod { date } => run_apod(&tracker, date).await,
        Command::Orbit { samples } => {
            run_orbit(samples);
            Ok(())
        }
    }
}
