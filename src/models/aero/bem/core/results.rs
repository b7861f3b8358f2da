//! Results types for blade element momentum solves.

use uom::si::f64::Angle;

use crate::support::units::LinearForce;

use super::SolveError;

/// Momentum region a section solution falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Classical momentum theory holds.
    Momentum,

    /// Axial induction above the critical value, resolved with an empirical
    /// thrust relation.
    HighInduction,

    /// Propeller brake state, where the rotor adds energy to the flow.
    PropellerBrake,
}

/// Loads and induction state of one blade section.
///
/// Force coefficients are in chord axes: normal to the chord (positive
/// toward the suction side) and along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionLoads {
    /// Normal force per unit span.
    pub normal: LinearForce,

    /// Tangential force per unit span.
    pub tangential: LinearForce,

    pub normal_coefficient: f64,
    pub tangential_coefficient: f64,

    /// Axial induction factor `a`, after every correction.
    pub axial_induction: f64,

    /// Tangential induction factor `a'`.
    pub tangential_induction: f64,

    /// Inflow angle of the relative velocity, from the rotor plane.
    pub inflow_angle: Angle,

    /// Hub/tip loss factor used by the momentum balance, 1 without a loss model.
    pub loss_factor: f64,

    pub regime: Regime,
}

/// Loads of every section at one azimuth.
#[derive(Debug, Clone, PartialEq)]
pub struct Loads {
    pub azimuth: Angle,

    /// One entry per rotor section, in rotor order.
    pub sections: Vec<SectionLoads>,
}

/// Loads over one revolution.
#[derive(Debug, Clone)]
pub struct Cycle {
    /// Evaluated azimuths, uniformly spaced in `[0, 2π)`.
    pub azimuths: Vec<Angle>,

    /// One result per azimuth, in the same order.
    pub loads: Vec<Result<Loads, SolveError>>,
}

impl Cycle {
    /// Returns `true` if every azimuth solved successfully.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.loads.iter().all(Result::is_ok)
    }

    /// Pairs each azimuth with its result.
    pub fn iter(&self) -> impl Iterator<Item = (Angle, &Result<Loads, SolveError>)> {
        self.azimuths.iter().copied().zip(&self.loads)
    }
}
