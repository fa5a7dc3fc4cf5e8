//! Demonstration orbit curve.
//!
//! A closed, slightly warped loop of radius 1 AU around the Sun, used to illustrate what a
//! heliocentric orbit looks like. It is not derived from any fetched orbital element.
//!
//! ```text
//! x = cos θ,  y = sin θ,  z = 0.2 · sin 2θ,   θ ∈ [0, 2π]
//! ```
use nalgebra::Vector3;

use crate::constants::DPI;

/// Position of the Sun in the curve frame (AU).
pub fn sun_position() -> Vector3<f64> {
    Vector3::zeros()
}

/// Amplitude of the out-of-plane warp (AU)
const WARP_AU: f64 = 0.2;

/// Point of the demonstration curve at angle `theta` (radians), in AU.
pub fn orbit_point(theta: f64) -> Vector3<f64> {
    Vector3::new(theta.cos(), theta.sin(), WARP_AU * (2.0 * theta).sin())
}

/// Sample the curve at `samples` angles evenly spaced over `[0, 2π]`, both ends included.
pub fn orbit_path(samples: usize) -> Vec<Vector3<f64>> {
    match samples {
        0 => Vec::new(),
        1 => vec![orbit_point(0.0)],
        n => (0..n)
            .map(|i| orbit_point(DPI * i as f64 / (n - 1) as f64))
            .collect(),
    }
}
