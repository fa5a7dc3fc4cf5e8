//! # Impact metrics
//!
//! Closed-form estimates used both for real asteroids (from NeoWs details) and for the
//! "what-if" simulation:
//!
//! ```text
//! d  = D_km · 1000                      [m]
//! m  = (π / 6) · d³ · ρ                 [kg]
//! E  = ½ · m · (v_km/s · 1000)²         [J]
//! Mt = E / 4.184e15                     [Mt TNT]
//! Dc = 0.016 · Mt^(1/3)                 [km]   (0 when Mt ≤ 0)
//! Δx = Δv · 5e6                         [km]   (conceptual deflection lever)
//! ```
//!
//! These are order-of-magnitude figures: no atmospheric entry, impact angle or target
//! material is modelled.
use std::f64::consts::PI;

use crate::constants::{
    Kilometer, KmPerSecond, MegatonTnt, Meter, MeterPerSecond, CRATER_SCALING_KM,
    DEFLECTION_KM_PER_M_S, DENSITY_KG_M3, JOULES_PER_MEGATON, KM_TO_M, SIM_DELTA_V_RANGE,
    SIM_DIAMETER_RANGE, SIM_VELOCITY_RANGE,
};
use crate::neo_errors::NeoError;

/// Kinetic energy of a spherical impactor of density `density_kg_m3`, in megatons of TNT.
///
/// No bound checks are applied: zero or negative inputs produce zero or meaningless (but
/// finite) values.
pub fn impact_energy_with_density(
    diameter_km: Kilometer,
    velocity_km_s: KmPerSecond,
    density_kg_m3: f64,
) -> MegatonTnt {
    let diameter_m: Meter = diameter_km * KM_TO_M;
    let volume_m3 = PI / 6.0 * diameter_m.powi(3);
    let mass_kg = volume_m3 * density_kg_m3;
    let velocity_m_s = velocity_km_s * KM_TO_M;
    let kinetic_energy_j = 0.5 * mass_kg * velocity_m_s.powi(2);
    kinetic_energy_j / JOULES_PER_MEGATON
}

/// [`impact_energy_with_density`] with the default stony density (3000 kg/m³).
pub fn impact_energy(diameter_km: Kilometer, velocity_km_s: KmPerSecond) -> MegatonTnt {
    impact_energy_with_density(diameter_km, velocity_km_s, DENSITY_KG_M3)
}

/// Final crater diameter produced by an impact of `megatons_tnt`, in km.
///
/// Returns `0` for non-positive (or NaN) energies.
pub fn crater_diameter(megatons_tnt: MegatonTnt) -> Kilometer {
    if megatons_tnt > 0.0 {
        CRATER_SCALING_KM * megatons_tnt.cbrt()
    } else {
        0.0
    }
}

/// Miss distance gained by a deflection of `delta_v_m_s`, in km.
pub fn deflection_distance(delta_v_m_s: MeterPerSecond) -> Kilometer {
    delta_v_m_s * DEFLECTION_KM_PER_M_S
}

/// Impact energy and crater size of one object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    pub impact_energy_mt: MegatonTnt,
    pub crater_diameter_km: Kilometer,
}

impl DerivedMetrics {
    /// Compute both metrics.
    ///
    /// When the energy is not strictly positive and finite, both fields are zero so that a
    /// report never shows a negative or undefined figure.
    pub fn compute(
        diameter_km: Kilometer,
        velocity_km_s: KmPerSecond,
        density_kg_m3: f64,
    ) -> Self {
        let energy = impact_energy_with_density(diameter_km, velocity_km_s, density_kg_m3);
        if !(energy.is_finite() && energy > 0.0) {
            return DerivedMetrics::default();
        }
        DerivedMetrics {
            impact_energy_mt: energy,
            crater_diameter_km: crater_diameter(energy),
        }
    }
}

/// Inputs of a "what-if" impact and deflection simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactScenario {
    pub diameter_km: Kilometer,
    pub velocity_km_s: KmPerSecond,
    pub delta_v_m_s: MeterPerSecond,
}

impl Default for ImpactScenario {
    fn default() -> Self {
        ImpactScenario {
            diameter_km: 0.5,
            velocity_km_s: 15.0,
            delta_v_m_s: 1.0,
        }
    }
}

impl ImpactScenario {
    /// Build a scenario, rejecting values outside the simulator ranges.
    ///
    /// Ranges
    /// ------
    /// * diameter: 0.05 – 5.0 km
    /// * velocity: 5.0 – 50.0 km/s
    /// * Δv: 0.0 – 10.0 m/s
    pub fn new(
        diameter_km: Kilometer,
        velocity_km_s: KmPerSecond,
        delta_v_m_s: MeterPerSecond,
    ) -> Result<Self, NeoError> {
        check_range("diameter (km)", diameter_km, SIM_DIAMETER_RANGE)?;
        check_range("velocity (km/s)", velocity_km_s, SIM_VELOCITY_RANGE)?;
        check_range("delta-v (m/s)", delta_v_m_s, SIM_DELTA_V_RANGE)?;
        Ok(ImpactScenario {
            diameter_km,
            velocity_km_s,
            delta_v_m_s,
        })
    }

    /// Run the scenario with the given impactor density.
    pub fn simulate(&self, density_kg_m3: f64) -> SimulationOutcome {
        let metrics = DerivedMetrics::compute(self.diameter_km, self.velocity_km_s, density_kg_m3);
        SimulationOutcome {
            scenario: *self,
            impact_energy_mt: metrics.impact_energy_mt,
            crater_diameter_km: metrics.crater_diameter_km,
            deflection_km: deflection_distance(self.delta_v_m_s),
        }
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<(), NeoError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(NeoError::InvalidScenario(format!(
            "{name} = {value} is outside [{min}, {max}]"
        )))
    }
}

/// Result of [`ImpactScenario::simulate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationOutcome {
    pub scenario: ImpactScenario,
    pub impact_energy_mt: MegatonTnt,
    pub crater_diameter_km: Kilometer,
    pub deflection_km: Kilometer,
}
