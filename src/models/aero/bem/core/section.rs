//! Per-section quantities shared by the induction solvers.

use std::f64::consts::TAU;

use uom::si::{
    angle::radian,
    f64::{Angle, Length, MassDensity, Velocity},
    length::meter,
    velocity::meter_per_second,
};

use crate::support::{
    aero::{Coefficients, Induction, OutOfRangeError, Rotor, Section, Station},
    units::{LinearForce, LinearForceExt},
};

use super::{
    ConvergenceError, OperatingCondition, Regime, SectionLoads, condition::Inflow,
    error::SectionError,
};

/// A blade section at one operating condition.
#[derive(Debug, Clone)]
pub(crate) struct Local<'a> {
    pub section: &'a Section,

    /// Where corrections are evaluated; `wake_skew` holds the yaw angle until
    /// a solver sets it.
    pub station: Station,

    /// Twist plus pitch, radians.
    pub theta: f64,

    /// Local solidity `σ' = B c / (2π r)`.
    pub solidity: f64,

    pub density: MassDensity,
}

impl<'a> Local<'a> {
    pub(crate) fn new(rotor: &Rotor, section: &'a Section, condition: &OperatingCondition) -> Self {
        let radius = section.radius.get::<meter>();
        let blades = rotor.blades();

        Self {
            section,
            station: Station {
                radius,
                hub_radius: rotor.hub_radius().get::<meter>(),
                tip_radius: rotor.tip_radius().get::<meter>(),
                blades,
                azimuth: condition.azimuth.get::<radian>(),
                yaw: condition.yaw.get::<radian>(),
                wake_skew: condition.yaw.get::<radian>(),
            },
            theta: (section.twist + condition.pitch).get::<radian>(),
            solidity: blades as f64 * section.chord.get::<meter>() / (TAU * radius),
            density: condition.density,
        }
    }

    pub(crate) fn radius(&self) -> f64 {
        self.station.radius
    }

    /// Station with the given wake skew angle.
    pub(crate) fn station_with_skew(&self, wake_skew: f64) -> Station {
        Station {
            wake_skew,
            ..self.station
        }
    }

    /// Polar lookup at an angle of attack in radians.
    pub(crate) fn coefficients(&self, alpha: f64) -> Result<Coefficients, OutOfRangeError> {
        self.section.airfoil.polar.coefficients(alpha)
    }

    /// Sectional loads for a converged solution.
    ///
    /// # Errors
    ///
    /// Fails if the polar lookup at the final angle of attack is out of range,
    /// or with [`ConvergenceError::DegenerateInflow`] if the loads are not finite.
    pub(crate) fn loads(&self, solution: &Solution) -> Result<SectionLoads, SectionError> {
        let relative = solution.frame.relative(solution.induction);
        let phi = relative.axial.atan2(relative.tangential);
        let alpha = phi - self.theta;

        let Coefficients { cl, cd } = self.coefficients(alpha)?;
        let (sin_alpha, cos_alpha) = alpha.sin_cos();
        let normal_coefficient = cl * cos_alpha + cd * sin_alpha;
        let tangential_coefficient = -cl * sin_alpha + cd * cos_alpha;

        let w = Velocity::new::<meter_per_second>(relative.axial.hypot(relative.tangential));
        let chord: Length = self.section.chord;
        let dynamic: LinearForce = self.density * w * w * chord * 0.5;

        let normal = dynamic * normal_coefficient;
        let tangential = dynamic * tangential_coefficient;

        if !(normal.newtons_per_meter().is_finite()
            && tangential.newtons_per_meter().is_finite()
            && solution.induction.axial.is_finite()
            && solution.induction.tangential.is_finite())
        {
            return Err(ConvergenceError::DegenerateInflow.into());
        }

        Ok(SectionLoads {
            normal,
            tangential,
            normal_coefficient,
            tangential_coefficient,
            axial_induction: solution.induction.axial,
            tangential_induction: solution.induction.tangential,
            inflow_angle: Angle::new::<radian>(phi),
            loss_factor: solution.loss,
            regime: solution.regime,
        })
    }
}

/// Converged induction state of one section, ready for load evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Solution {
    pub induction: Induction,
    pub loss: f64,
    pub regime: Regime,
    pub frame: Frame,
}

impl Solution {
    /// Axial velocity that drives the dynamic inflow filter, m/s.
    pub(crate) fn axial_velocity(&self) -> f64 {
        match self.frame {
            Frame::Uncoupled { inflow } => inflow.axial,
            Frame::Coupled { hub, .. } => hub.axial,
        }
    }
}

/// How induction factors map to the relative velocity at a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Frame {
    /// `(U_x (1 - a), U_y (1 + a'))`.
    Uncoupled { inflow: Inflow },

    /// Skewed-wake velocities of the coupled model (angles in radians).
    Coupled {
        hub: Inflow,
        wake_skew: f64,
        yaw: f64,
        azimuth: f64,
    },
}

impl Frame {
    /// Relative velocity components for the given induction factors, m/s.
    pub(crate) fn relative(&self, induction: Induction) -> Inflow {
        let Induction {
            axial: a,
            tangential: a_prime,
        } = induction;

        match *self {
            Self::Uncoupled { inflow } => Inflow {
                axial: inflow.axial * (1.0 - a),
                tangential: inflow.tangential * (1.0 + a_prime),
            },
            Self::Coupled {
                hub,
                wake_skew,
                yaw,
                azimuth,
            } => {
                let (sin_chi, cos_chi) = wake_skew.sin_cos();
                let (sin_psi, cos_psi) = azimuth.sin_cos();
                let lift = 1.0 + sin_chi * sin_psi;

                Inflow {
                    axial: hub.axial * (yaw.cos() - a)
                        + hub.tangential * a_prime * sin_chi * cos_psi * lift,
                    tangential: hub.tangential * (1.0 + a_prime * cos_chi * lift)
                        + hub.axial * cos_psi * (a * (wake_skew / 2.0).tan() - yaw.sin()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::aero::bem::core::test_support::{condition, rotor};

    #[test]
    fn frames_agree_without_skew() {
        let inflow = Inflow {
            axial: 8.0,
            tangential: 30.0,
        };
        let induction = Induction {
            axial: 0.3,
            tangential: 0.02,
        };

        let uncoupled = Frame::Uncoupled { inflow }.relative(induction);
        let coupled = Frame::Coupled {
            hub: inflow,
            wake_skew: 0.0,
            yaw: 0.0,
            azimuth: 1.3,
        }
        .relative(induction);

        assert_relative_eq!(uncoupled.axial, 5.6, epsilon = 1e-12);
        assert_relative_eq!(uncoupled.tangential, 30.6, epsilon = 1e-12);
        assert_relative_eq!(coupled.axial, uncoupled.axial, epsilon = 1e-12);
        assert_relative_eq!(coupled.tangential, uncoupled.tangential, epsilon = 1e-12);
    }

    #[test]
    fn loads_scale_with_dynamic_pressure() {
        let rotor = rotor();
        let section = &rotor.sections()[2];
        let local = Local::new(&rotor, section, &condition(8.0, 3.0));

        let solution = |axial: f64| Solution {
            induction: Induction::default(),
            loss: 1.0,
            regime: Regime::Momentum,
            frame: Frame::Uncoupled {
                inflow: Inflow {
                    axial,
                    tangential: 0.0,
                },
            },
        };

        // Flow along the rotor axis: φ = π/2.
        let slow = local.loads(&solution(5.0)).unwrap();
        let fast = local.loads(&solution(10.0)).unwrap();

        assert_relative_eq!(slow.inflow_angle.get::<radian>(), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(
            fast.normal.newtons_per_meter(),
            4.0 * slow.normal.newtons_per_meter(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            fast.tangential.newtons_per_meter(),
            4.0 * slow.tangential.newtons_per_meter(),
            max_relative = 1e-12
        );
    }
}
