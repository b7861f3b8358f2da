//! Operating conditions and the blade velocity triangle.

use uom::{
    ConstZero,
    si::{
        angle::radian,
        angular_velocity::radian_per_second,
        f64::{Angle, AngularVelocity, MassDensity, Velocity},
        mass_density::kilogram_per_cubic_meter,
        velocity::meter_per_second,
    },
};

use crate::support::aero::Rotor;

/// Wind and rotor state for one evaluation.
///
/// Built with [`OperatingCondition::new`]; yaw and azimuth default to zero
/// and density to sea-level air (1.225 kg/m³).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingCondition {
    /// Free-stream wind speed.
    pub wind: Velocity,

    /// Rotor angular velocity.
    pub omega: AngularVelocity,

    /// Collective blade pitch.
    pub pitch: Angle,

    /// Inflow yaw angle.
    pub yaw: Angle,

    /// Blade azimuth, zero with the blade pointing up.
    pub azimuth: Angle,

    /// Air density.
    pub density: MassDensity,
}

impl OperatingCondition {
    #[must_use]
    pub fn new(wind: Velocity, omega: AngularVelocity, pitch: Angle) -> Self {
        Self {
            wind,
            omega,
            pitch,
            yaw: Angle::ZERO,
            azimuth: Angle::ZERO,
            density: MassDensity::new::<kilogram_per_cubic_meter>(1.225),
        }
    }

    #[must_use]
    pub fn with_yaw(self, yaw: Angle) -> Self {
        Self { yaw, ..self }
    }

    #[must_use]
    pub fn with_azimuth(self, azimuth: Angle) -> Self {
        Self { azimuth, ..self }
    }

    #[must_use]
    pub fn with_density(self, density: MassDensity) -> Self {
        Self { density, ..self }
    }

    /// The same condition at another blade azimuth, in radians.
    pub(super) fn at_azimuth(&self, azimuth: f64) -> Self {
        self.with_azimuth(Angle::new::<radian>(azimuth))
    }

    /// Undisturbed velocity components seen by a blade section at `radius` (m).
    ///
    /// Accounts for yaw, shaft tilt and precone. Induction is not included.
    pub(super) fn inflow(&self, rotor: &Rotor, radius: f64) -> Inflow {
        let wind = self.wind.get::<meter_per_second>();
        let omega = self.omega.get::<radian_per_second>();
        let psi = self.azimuth.get::<radian>();
        let yaw = self.yaw.get::<radian>();
        let tilt = rotor.tilt().get::<radian>();
        let precone = rotor.precone().get::<radian>();

        let axial = wind
            * ((yaw.cos() * tilt.sin() * psi.cos() + yaw.sin() * psi.sin()) * precone.sin()
                + yaw.cos() * tilt.cos() * precone.cos());
        let tangential = wind * (tilt.cos() * precone.sin() * psi.sin() - yaw.sin() * psi.cos())
            + omega * radius * precone.cos();

        Inflow { axial, tangential }
    }

    /// Axial and rotational velocity components used by the coupled model.
    ///
    /// These ignore yaw and tilt, which the coupled residuals handle through
    /// the skew angles.
    pub(super) fn hub_inflow(&self, rotor: &Rotor, radius: f64) -> Inflow {
        let precone = rotor.precone().get::<radian>();
        Inflow {
            axial: self.wind.get::<meter_per_second>() * precone.cos(),
            tangential: self.omega.get::<radian_per_second>() * radius * precone.cos(),
        }
    }
}

/// Axial and tangential velocity components at a section, m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Inflow {
    pub axial: f64,
    pub tangential: f64,
}

impl Inflow {
    /// Ratio `U_x / U_y`, or `None` when it is not a finite number.
    pub(crate) fn ratio(&self) -> Option<f64> {
        let ratio = self.axial / self.tangential;
        ratio.is_finite().then_some(ratio)
    }
}
