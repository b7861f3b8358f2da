use std::f64::consts::PI;

use super::Station;

/// Pitt and Peters skewed wake correction.
///
/// Adds a once-per-revolution variation to the axial induction:
/// `a ← a (1 + K tan(χ/2) r/R sin ψ)`. With an aligned wake (`χ = 0`) the
/// correction leaves `a` unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PittPeters {
    /// Amplitude factor `K`, `15π/64` in Pitt and Peters (1981).
    pub factor: f64,
}

impl Default for PittPeters {
    fn default() -> Self {
        Self {
            factor: 15.0 * PI / 64.0,
        }
    }
}

impl PittPeters {
    #[must_use]
    pub fn axial_induction(&self, axial_induction: f64, station: &Station) -> f64 {
        axial_induction
            * (1.0
                + self.factor
                    * (station.wake_skew / 2.0).tan()
                    * station.radius
                    / station.tip_radius
                    * station.azimuth.sin())
    }
}
