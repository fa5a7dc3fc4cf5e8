//! # NeoWs lookup: per-object details
//!
//! For every hazardous identifier the tracker calls the NeoWs **lookup** endpoint
//! (`<lookup_url>/<id>?api_key=<key>`) and extracts an [`AsteroidDetail`].
//!
//! ## Required and optional fields
//!
//! | Field                          | JSON path                                                   | Required |
//! |--------------------------------|-------------------------------------------------------------|----------|
//! | diameter (km, max estimate)    | `estimated_diameter.kilometers.estimated_diameter_max`      | yes      |
//! | relative velocity (km/s)       | `close_approach_data[0].relative_velocity.kilometers_per_second` | yes |
//! | miss distance (lunar)          | `close_approach_data[0].miss_distance.lunar`                | yes      |
//! | close approach date            | `close_approach_data[0].close_approach_date_full`           | no       |
//! | orbital period (days)          | `orbital_data.orbital_period`                               | no       |
//! | eccentricity, inclination      | `orbital_data.{eccentricity, inclination}`                  | no       |
//! | orbit class                    | `orbital_data.orbit_class.{orbit_class_type, orbit_class_description}` | no |
//!
//! NeoWs encodes most numbers as strings; both strings and JSON numbers are accepted.
//! A missing or unparseable required field makes [`parse_lookup`] fail, which the report
//! builder turns into a skipped row.
use reqwest::Url;
use serde::Deserialize;

use crate::config::NeoConfig;
use crate::constants::{Day, Kilometer, KmPerSecond, LunarDistance, NeoId, JPL_SBDB_URL};
use crate::env_state::NeoEnv;
use crate::neo_errors::NeoError;

/// A number as NeoWs sends it: sometimes quoted, sometimes not.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Read a physical magnitude: finite and non-negative, otherwise [`NeoError::InvalidNumber`].
    fn to_f64(&self, field: &'static str) -> Result<f64, NeoError> {
        let invalid = || NeoError::InvalidNumber {
            field,
            value: self.clone().into_text(),
        };
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(invalid())
        }
    }

    fn into_text(self) -> String {
        match self {
            Numeric::Number(n) => n.to_string(),
            Numeric::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    name: Option<String>,
    estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default)]
    close_approach_data: Vec<CloseApproach>,
    orbital_data: Option<OrbitalData>,
}

#[derive(Debug, Deserialize)]
struct EstimatedDiameter {
    kilometers: Option<DiameterRange>,
}

#[derive(Debug, Deserialize)]
struct DiameterRange {
    estimated_diameter_max: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
struct CloseApproach {
    close_approach_date: Option<String>,
    close_approach_date_full: Option<String>,
    relative_velocity: Option<RelativeVelocity>,
    miss_distance: Option<MissDistance>,
}

#[derive(Debug, Deserialize)]
struct RelativeVelocity {
    kilometers_per_second: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
struct MissDistance {
    lunar: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
struct OrbitalData {
    orbital_period: Option<Numeric>,
    eccentricity: Option<Numeric>,
    inclination: Option<Numeric>,
    orbit_class: Option<OrbitClass>,
}

#[derive(Debug, Deserialize)]
struct OrbitClass {
    orbit_class_type: Option<String>,
    orbit_class_description: Option<String>,
}

/// Physical and orbital parameters of one hazardous asteroid.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidDetail {
    pub id: NeoId,
    pub name: String,
    /// Date part of the first close approach, as NeoWs writes it (e.g. `2025-Oct-04`).
    pub close_approach_date: Option<String>,
    pub estimated_diameter_km: Kilometer,
    pub relative_velocity_km_s: KmPerSecond,
    pub miss_distance_lunar: LunarDistance,
    pub orbital_period_days: Option<Day>,
    pub eccentricity: Option<String>,
    pub inclination_deg: Option<String>,
    pub orbit_class_type: Option<String>,
    pub orbit_class_description: Option<String>,
}

impl AsteroidDetail {
    /// Link to the JPL Small-Body Database page of this object.
    pub fn jpl_url(&self) -> String {
        format!("{JPL_SBDB_URL}{}", self.id)
    }
}

/// Build the lookup URL for one object.
pub fn lookup_url(config: &NeoConfig, id: &str) -> Result<Url, NeoError> {
    let invalid = || NeoError::InvalidUrl(format!("{}/{id}", config.lookup_url));
    let mut url = Url::parse(&config.lookup_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(id);
    url.query_pairs_mut().append_pair("api_key", &config.api_key);
    Ok(url)
}

/// Extract an [`AsteroidDetail`] from a lookup body.
///
/// Arguments
/// ---------
/// * `id`: identifier that was looked up (kept for the JPL link)
/// * `body`: JSON body returned by the lookup endpoint
///
/// Return
/// ------
/// * The detail, or an error when the body is not JSON or a required field is
///   missing or not a number
pub fn parse_lookup(id: &str, body: &str) -> Result<AsteroidDetail, NeoError> {
    let lookup: LookupResponse = serde_json::from_str(body)?;

    let estimated_diameter_km = lookup
        .estimated_diameter
        .and_then(|d| d.kilometers)
        .and_then(|km| km.estimated_diameter_max)
        .ok_or(NeoError::MissingField(
            "estimated_diameter.kilometers.estimated_diameter_max",
        ))?
        .to_f64("estimated_diameter_max")?;

    let approach = lookup
        .close_approach_data
        .into_iter()
        .next()
        .ok_or(NeoError::MissingField("close_approach_data"))?;

    let relative_velocity_km_s = approach
        .relative_velocity
        .and_then(|v| v.kilometers_per_second)
        .ok_or(NeoError::MissingField(
            "close_approach_data.relative_velocity.kilometers_per_second",
        ))?
        .to_f64("kilometers_per_second")?;

    let miss_distance_lunar = approach
        .miss_distance
        .and_then(|m| m.lunar)
        .ok_or(NeoError::MissingField("close_approach_data.miss_distance.lunar"))?
        .to_f64("lunar")?;

    // "2025-Oct-04 12:31" -> "2025-Oct-04"
    let close_approach_date = approach
        .close_approach_date_full
        .or(approach.close_approach_date)
        .and_then(|full| full.split_whitespace().next().map(str::to_string));

    let (orbital_period_days, eccentricity, inclination_deg, orbit_class_type, orbit_class_description) =
        match lookup.orbital_data {
            Some(orbit) => {
                let (class_type, class_description) = orbit
                    .orbit_class
                    .map(|c| (c.orbit_class_type, c.orbit_class_description))
                    .unwrap_or_default();
                (
                    orbit
                        .orbital_period
                        .and_then(|p| p.to_f64("orbital_period").ok()),
                    orbit.eccentricity.map(Numeric::into_text),
                    orbit.inclination.map(Numeric::into_text),
                    class_type,
                    class_description,
                )
            }
            None => (None, None, None, None, None),
        };

    Ok(AsteroidDetail {
        id: id.to_string(),
        name: lookup.name.unwrap_or_else(|| "N/A".to_string()),
        close_approach_date,
        estimated_diameter_km,
        relative_velocity_km_s,
        miss_distance_lunar,
        orbital_period_days,
        eccentricity,
        inclination_deg,
        orbit_class_type,
        orbit_class_description,
    })
}

/// Look up one object and extract its detail.
///
/// This is the fallible form of the enrichment step; the fail-soft form lives on
/// [`NeoTrack::fetch_detail`](crate::neotrack::NeoTrack::fetch_detail).
pub async fn fetch_detail(
    env: &NeoEnv,
    config: &NeoConfig,
    id: &str,
) -> Result<AsteroidDetail, NeoError> {
    let url = lookup_url(config, id)?;
    let body = env.get_from_url(&url).await?;
    parse_lookup(id, &body)
}

#[cfg(test)]
pub(crate) mod neo_lookup_test {
    use super::*;

    pub(crate) const LOOKUP_3542519: &str = r#"{
        "id": "3542519",
        "name": "(2010 PK9)",
        "estimated_diameter": {
            "kilometers": {
                "estimated_diameter_min": 0.1058168859,
                "estimated_diameter_max": 0.2366137501
            }
        },
        "is_potentially_hazardous_asteroid": true,
        "close_approach_data": [
            {
                "close_approach_date": "2025-10-04",
                "close_approach_date_full": "2025-Oct-04 12:31",
                "relative_velocity": {"kilometers_per_second": "17.8461537811"},
                "miss_distance": {"lunar": "18.4736452011"}
            },
            {
                "close_approach_date": "2031-05-01",
                "relative_velocity": {"kilometers_per_second": "9.0"},
                "miss_distance": {"lunar": "150.0"}
            }
        ],
        "orbital_data": {
            "orbital_period": "1254.8452003918",
            "eccentricity": ".5911012102440894",
            "inclination": "9.384516082069128",
            "orbit_class": {
                "orbit_class_type": "APO",
                "orbit_class_description": "Near-Earth asteroid orbits which cross the Earth's orbit similar to that of 1862 Apollo"
            }
        }
    }"#;

    #[test]
    fn test_parse_lookup_full() {
        let detail = parse_lookup("3542519", LOOKUP_3542519).unwrap();
        assert_eq!(detail.name, "(2010 PK9)");
        assert_eq!(detail.close_approach_date.as_deref(), Some("2025-Oct-04"));
        assert_eq!(detail.estimated_diameter_km, 0.2366137501);
        assert_eq!(detail.relative_velocity_km_s, 17.8461537811);
        assert_eq!(detail.miss_distance_lunar, 18.4736452011);
        assert_eq!(detail.orbital_period_days, Some(1254.8452003918));
        assert_eq!(detail.eccentricity.as_deref(), Some(".5911012102440894"));
        assert_eq!(detail.inclination_deg.as_deref(), Some("9.384516082069128"));
        assert_eq!(detail.orbit_class_type.as_deref(), Some("APO"));
        assert_eq!(
            detail.jpl_url(),
            "https://ssd.jpl.nasa.gov/tools/sbdb_lookup.html#/?sstr=3542519"
        );
    }

    #[test]
    fn test_parse_lookup_minimal() {
        let body = r#"{
            "estimated_diameter": {"kilometers": {"estimated_diameter_max": 1.5}},
            "close_approach_data": [{
                "close_approach_date": "2025-10-04",
                "relative_velocity": {"kilometers_per_second": 20},
                "miss_distance": {"lunar": "3.5"}
            }]
        }"#;
        let detail = parse_lookup("42", body).unwrap();
        assert_eq!(detail.name, "N/A");
        assert_eq!(detail.close_approach_date.as_deref(), Some("2025-10-04"));
        assert_eq!(detail.relative_velocity_km_s, 20.0);
        assert_eq!(detail.orbital_period_days, None);
        assert_eq!(detail.eccentricity, None);
        assert_eq!(detail.orbit_class_description, None);
    }

    #[test]
    fn test_missing_diameter() {
        let body = r#"{"close_approach_data": [{
            "relative_velocity": {"kilometers_per_second": "20"},
            "miss_distance": {"lunar": "3.5"}
        }]}"#;
        assert_eq!(
            parse_lookup("42", body),
            Err(NeoError::MissingField(
                "estimated_diameter.kilometers.estimated_diameter_max"
            ))
        );
    }

    #[test]
    fn test_empty_close_approach() {
        let body = r#"{
            "estimated_diameter": {"kilometers": {"estimated_diameter_max": 1.5}},
            "close_approach_data": []
        }"#;
        assert_eq!(
            parse_lookup("42", body),
            Err(NeoError::MissingField("close_approach_data"))
        );
    }

    #[test]
    fn test_malformed_velocity() {
        let body = r#"{
            "estimated_diameter": {"kilometers": {"estimated_diameter_max": 1.5}},
            "close_approach_data": [{
                "relative_velocity": {"kilometers_per_second": "fast"},
                "miss_distance": {"lunar": "3.5"}
            }]
        }"#;
        assert_eq!(
            parse_lookup("42", body),
            Err(NeoError::InvalidNumber {
                field: "kilometers_per_second",
                value: "fast".into()
            })
        );
    }

    #[test]
    fn test_non_finite_or_negative_values_are_rejected() {
        let body = |velocity: &str, lunar: &str| {
            format!(
                r#"{{
                "estimated_diameter": {{"kilometers": {{"estimated_diameter_max": 1.5}}}},
                "close_approach_data": [{{
                    "relative_velocity": {{"kilometers_per_second": "{velocity}"}},
                    "miss_distance": {{"lunar": "{lunar}"}}
                }}]
            }}"#
            )
        };
        assert_eq!(
            parse_lookup("42", &body("inf", "3.5")),
            Err(NeoError::InvalidNumber {
                field: "kilometers_per_second",
                value: "inf".into()
            })
        );
        assert_eq!(
            parse_lookup("42", &body("NaN", "3.5")),
            Err(NeoError::InvalidNumber {
                field: "kilometers_per_second",
                value: "NaN".into()
            })
        );
        assert_eq!(
            parse_lookup("42", &body("20", "-1")),
            Err(NeoError::InvalidNumber {
                field: "lunar",
                value: "-1".into()
            })
        );
        assert!(parse_lookup("42", &body("20", "0")).is_ok());
    }

    #[test]
    fn test_malformed_orbital_period_is_absent() {
        let body = r#"{
            "estimated_diameter": {"kilometers": {"estimated_diameter_max": 1.5}},
            "close_approach_data": [{
                "relative_velocity": {"kilometers_per_second": "20"},
                "miss_distance": {"lunar": "3.5"}
            }],
            "orbital_data": {"orbital_period": "n/a", "eccentricity": 0.25}
        }"#;
        let detail = parse_lookup("42", body).unwrap();
        assert_eq!(detail.orbital_period_days, None);
        assert_eq!(detail.eccentricity.as_deref(), Some("0.25"));
    }

    #[test]
    fn test_lookup_url() {
        let config = NeoConfig::builder().api_key("K").build().unwrap();
        assert_eq!(
            lookup_url(&config, "3542519").unwrap().as_str(),
            "https://api.nasa.gov/neo/rest/v1/neo/3542519?api_key=K"
        );

        let trailing = NeoConfig::builder()
            .lookup_url("https://example.org/neo/")
            .build()
            .unwrap();
        assert!(lookup_url(&trailing, "1")
            .unwrap()
            .as_str()
            .starts_with("https://example.org/neo/1?api_key="));
    }
}
