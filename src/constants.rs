//! # Constants and type definitions for neotrack
//!
//! This module centralizes the **physical constants**, **unit conversions**, the **default
//! NASA endpoints** and the **type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Physical constants for the impact model (density, TNT equivalence, crater scaling)
//! - Limits of the user-facing inputs (date range span, simulation slider ranges)
//! - Default NASA API base URLs
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Typical bulk density of a stony asteroid (kg/m³)
pub const DENSITY_KG_M3: f64 = 3000.0;

/// Energy released by one megaton of TNT, in joules
pub const JOULES_PER_MEGATON: f64 = 4.184e15;

/// Empirical crater scaling coefficient, in km per Mt^(1/3)
pub const CRATER_SCALING_KM: f64 = 0.016;

/// Conceptual lever between an applied Δv (m/s) and the resulting miss distance (km)
pub const DEFLECTION_KM_PER_M_S: f64 = 5_000_000.0;

/// Kilometers → meters
pub const KM_TO_M: f64 = 1000.0;

/// 2π, useful for sampling closed curves
pub const DPI: f64 = 2. * std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// Input limits
// -------------------------------------------------------------------------------------------------

/// Maximum number of days the NeoWs feed accepts between start and end date
pub const MAX_RANGE_DAYS: u32 = 7;

/// First date with an Astronomy Picture of the Day (year, month, day)
pub const APOD_FIRST_DATE: (i32, u8, u8) = (1995, 6, 16);

/// Admissible diameter for a simulated impactor (km)
pub const SIM_DIAMETER_RANGE: (Kilometer, Kilometer) = (0.05, 5.0);

/// Admissible velocity for a simulated impactor (km/s)
pub const SIM_VELOCITY_RANGE: (KmPerSecond, KmPerSecond) = (5.0, 50.0);

/// Admissible deflection Δv for a simulated mission (m/s)
pub const SIM_DELTA_V_RANGE: (MeterPerSecond, MeterPerSecond) = (0.0, 10.0);

/// Number of samples of the demonstration orbit curve
pub const ORBIT_PATH_SAMPLES: usize = 200;

// -------------------------------------------------------------------------------------------------
// NASA endpoints
// -------------------------------------------------------------------------------------------------

/// Public rate-limited key accepted by api.nasa.gov
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// NeoWs feed endpoint (objects approaching Earth within a date range)
pub const FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";

/// NeoWs lookup endpoint, the object id is appended as the last path segment
pub const LOOKUP_URL: &str = "https://api.nasa.gov/neo/rest/v1/neo";

/// Astronomy Picture of the Day endpoint
pub const APOD_URL: &str = "https://api.nasa.gov/planetary/apod";

/// JPL Small-Body Database lookup page, the object id is appended
pub const JPL_SBDB_URL: &str = "https://ssd.jpl.nasa.gov/tools/sbdb_lookup.html#/?sstr=";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Speed in kilometers per second
pub type KmPerSecond = f64;
/// Speed in meters per second
pub type MeterPerSecond = f64;
/// Energy in megatons of TNT
pub type MegatonTnt = f64;
/// Distance in lunar distances (Earth–Moon mean distance)
pub type LunarDistance = f64;
/// Duration in days
pub type Day = f64;
/// NeoWs object identifier (SPK-ID as a string, e.g. `"3542519"`)
pub type NeoId = String;
