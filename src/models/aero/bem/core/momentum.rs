//! Momentum-side relations of the induction solvers.
//!
//! Momentum theory predicts a thrust coefficient that peaks at `a = 0.5` and
//! falls beyond it, which measured rotors do not show. Above a critical
//! induction the solvers switch to an empirical [`Breakdown`] branch instead.

use crate::support::aero::{correction::BuhlThrust, momentum};

use super::{Regime, condition::Inflow};

/// Empirical branch for the high-induction (turbulent wake) state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Breakdown {
    /// Buhl's quadratic, continuous with momentum theory at `a = 0.4`.
    #[default]
    Buhl,

    /// Spera's linear extension above a configurable critical induction,
    /// typically 0.2.
    Spera { critical_induction: f64 },
}

impl Breakdown {
    /// Axial induction where the branch takes over from momentum theory.
    #[must_use]
    pub fn critical_induction(&self) -> f64 {
        match self {
            Self::Buhl => 0.4,
            Self::Spera { critical_induction } => *critical_induction,
        }
    }

    /// Value of `κ = a / (1 - a)` at the critical induction.
    pub(super) fn critical_kappa(&self) -> f64 {
        let a_c = self.critical_induction();
        a_c / (1.0 - a_c)
    }

    /// Axial induction from `κ = σ' Cx / (4 F sin²φ)` above the critical value.
    ///
    /// `epsilon` guards the Buhl root against a vanishing denominator.
    pub(super) fn axial_induction(&self, kappa: f64, loss: f64, epsilon: f64) -> f64 {
        match self {
            Self::Buhl => {
                let two_f_kappa = 2.0 * loss * kappa;
                let g1 = two_f_kappa - (10.0 / 9.0 - loss);
                let g2 = two_f_kappa - loss * (4.0 / 3.0 - loss);
                let g3 = two_f_kappa - (25.0 / 9.0 - 2.0 * loss);

                if g3.abs() < epsilon {
                    1.0 - 1.0 / (2.0 * g2.sqrt())
                } else {
                    (g1 - g2.abs().sqrt()) / g3
                }
            }
            Self::Spera { critical_induction } => {
                let a_c = *critical_induction;
                let k = 1.0 / kappa;
                let b = k * (1.0 - 2.0 * a_c);
                0.5 * (2.0 + b - ((b + 2.0).powi(2) + 4.0 * (k * a_c * a_c - 1.0)).sqrt())
            }
        }
    }

    /// Thrust coefficient of the branch at axial induction `a`.
    pub(super) fn thrust(&self, a: f64, loss: f64) -> f64 {
        match self {
            Self::Buhl => {
                8.0 / 9.0 + (4.0 * loss - 40.0 / 9.0) * a + (50.0 / 9.0 - 4.0 * loss) * a * a
            }
            Self::Spera { critical_induction } => {
                let a_c = *critical_induction;
                4.0 * loss * (a_c * a_c + (1.0 - 2.0 * a_c) * a)
            }
        }
    }
}

/// Momentum thrust coefficient of the coupled model.
///
/// Uses the skewed momentum relation up to the critical induction, the
/// high-induction model of the correction chain (or else the configured
/// breakdown branch) up to `a = 1`, and the propeller brake relation beyond.
pub(super) fn thrust(
    a: f64,
    loss: f64,
    yaw: f64,
    breakdown: Breakdown,
    high_induction: Option<&BuhlThrust>,
) -> (f64, Regime) {
    let critical = high_induction.map_or(breakdown.critical_induction(), |model| model.beta);

    if a <= critical {
        (
            momentum::thrust_coefficient(a, loss, yaw),
            Regime::Momentum,
        )
    } else if a <= 1.0 {
        let ct = match high_induction {
            Some(model) => model.thrust(a, loss, yaw),
            None => breakdown.thrust(a, loss),
        };
        (ct, Regime::HighInduction)
    } else {
        (
            4.0 * a * loss * (a - 1.0) * yaw.cos(),
            Regime::PropellerBrake,
        )
    }
}

/// Momentum torque coefficient of the coupled model.
///
/// `CQ = 4 (U_y / U_x) a' F (cos γ - a) (cos²ψ + cos²χ sin²ψ)`.
pub(super) fn torque(
    a: f64,
    a_prime: f64,
    hub: Inflow,
    loss: f64,
    wake_skew: f64,
    azimuth: f64,
    yaw: f64,
) -> f64 {
    let (sin_psi, cos_psi) = azimuth.sin_cos();
    let cos_chi = wake_skew.cos();
    4.0 * (hub.tangential / hub.axial)
        * a_prime
        * loss
        * (yaw.cos() - a)
        * (cos_psi * cos_psi + cos_chi * cos_chi * sin_psi * sin_psi)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn branches_meet_momentum_at_critical_induction() {
        for breakdown in [
            Breakdown::Buhl,
            Breakdown::Spera {
                critical_induction: 0.2,
            },
        ] {
            let a_c = breakdown.critical_induction();
            let kappa = breakdown.critical_kappa();

            assert_relative_eq!(
                breakdown.axial_induction(kappa, 1.0, 1e-5),
                a_c,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                breakdown.thrust(a_c, 1.0),
                4.0 * a_c * (1.0 - a_c),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn buhl_reaches_two_at_full_induction() {
        assert_relative_eq!(Breakdown::Buhl.thrust(1.0, 1.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(Breakdown::Buhl.thrust(1.0, 0.5), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn induction_grows_with_loading() {
        let breakdown = Breakdown::Buhl;
        let low = breakdown.axial_induction(1.0, 0.9, 1e-5);
        let high = breakdown.axial_induction(3.0, 0.9, 1e-5);
        assert!(low > 0.4 && high > low && high < 1.0, "{low} {high}");
    }

    #[test]
    fn coupled_thrust_regimes() {
        let (ct, regime) = thrust(0.3, 1.0, 0.0, Breakdown::Buhl, None);
        assert_relative_eq!(ct, 0.84, epsilon = 1e-12);
        assert_eq!(regime, Regime::Momentum);

        let (ct, regime) = thrust(0.7, 1.0, 0.0, Breakdown::Buhl, None);
        assert_relative_eq!(ct, Breakdown::Buhl.thrust(0.7, 1.0));
        assert_eq!(regime, Regime::HighInduction);

        let buhl = BuhlThrust::default();
        let (ct, _) = thrust(0.7, 1.0, 0.2, Breakdown::Buhl, Some(&buhl));
        assert_relative_eq!(ct, buhl.thrust(0.7, 1.0, 0.2));

        let (_, regime) = thrust(1.2, 1.0, 0.0, Breakdown::Buhl, None);
        assert_eq!(regime, Regime::PropellerBrake);
    }

    #[test]
    fn torque_matches_axisymmetric_form() {
        let hub = Inflow {
            axial: 8.0,
            tangential: 40.0,
        };
        assert_relative_eq!(
            torque(0.3, 0.01, hub, 0.9, 0.0, 1.0, 0.0),
            4.0 * 5.0 * 0.01 * 0.9 * 0.7,
            epsilon = 1e-12
        );
    }
}
