use std::f64::consts::FRAC_2_PI;

use super::Station;

/// Prandtl hub and tip loss factor.
///
/// `F = F_tip * F_hub` with
/// `F_tip = 2/π acos(exp(-B/2 (R - r) / (r |sin φ|)))` and
/// `F_hub = 2/π acos(exp(-B/2 (r - R_hub) / (R_hub |sin φ|)))`.
/// The hub factor is 1 for a rotor without a hub (`R_hub = 0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrandtlLoss {
    /// Lower bound on `F`, keeping the momentum equations finite at the hub
    /// and tip stations where the raw factor vanishes.
    pub epsilon: f64,
}

impl Default for PrandtlLoss {
    fn default() -> Self {
        Self { epsilon: 1e-12 }
    }
}

impl PrandtlLoss {
    /// Loss factor at a station for an inflow angle in radians.
    #[must_use]
    pub fn factor(&self, station: &Station, inflow_angle: f64) -> f64 {
        let half_blades = station.blades as f64 / 2.0;
        let sin_phi = inflow_angle.sin().abs();
        let r = station.radius;

        let f_tip = {
            let f = half_blades * (station.tip_radius - r) / (r * sin_phi);
            FRAC_2_PI * (-f).exp().acos()
        };

        let f_hub = if station.hub_radius > 0.0 {
            let f = half_blades * (r - station.hub_radius) / (station.hub_radius * sin_phi);
            FRAC_2_PI * (-f).exp().acos()
        } else {
            1.0
        };

        // `f64::max` discards a NaN from 0/0 at the bounds.
        (f_tip * f_hub).max(self.epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn station(radius: f64) -> Station {
        Station {
            radius,
            hub_radius: 0.2,
            tip_radius: 2.0,
            blades: 3,
            azimuth: 0.0,
            yaw: 0.0,
            wake_skew: 0.0,
        }
    }

    #[test]
    fn vanishes_at_the_tip() {
        let loss = PrandtlLoss::default();
        assert_relative_eq!(loss.factor(&station(2.0), 0.2), 1e-12);
        assert_relative_eq!(loss.factor(&station(0.2), 0.2), 1e-12);
    }

    #[test]
    fn approaches_one_mid_span() {
        let loss = PrandtlLoss::default();
        let f = loss.factor(&station(1.0), 0.1);
        assert!(f > 0.99 && f <= 1.0, "f = {f}");
    }

    #[test]
    fn decreases_toward_the_tip() {
        let loss = PrandtlLoss::default();
        let inner = loss.factor(&station(1.6), 0.15);
        let outer = loss.factor(&station(1.9), 0.15);
        assert!(outer < inner);
    }

    #[test]
    fn no_hub_loss_without_hub() {
        let loss = PrandtlLoss::default();
        let with_hub = station(0.25);
        let without_hub = Station {
            hub_radius: 0.0,
            ..with_hub
        };
        assert!(loss.factor(&without_hub, 0.3) > loss.factor(&with_hub, 0.3));
    }
}
