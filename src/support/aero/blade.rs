//! Rotor and blade geometry.
//!
//! Blades are identical and rigid. Each blade is described by an ordered
//! list of [`Section`]s from root to tip; every section references a shared
//! [`Airfoil`] so several sections can reuse one polar table.

use std::sync::Arc;

use thiserror::Error;
use uom::{
    ConstZero,
    si::{
        angle::radian,
        f64::{Angle, Length},
        length::meter,
    },
};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::PolarTable;

/// A named airfoil and its polar.
#[derive(Debug, Clone, PartialEq)]
pub struct Airfoil {
    pub name: String,
    pub polar: PolarTable,
}

impl Airfoil {
    pub fn new(name: impl Into<String>, polar: PolarTable) -> Self {
        Self {
            name: name.into(),
            polar,
        }
    }
}

/// A blade station: radius, chord, twist and airfoil.
#[derive(Debug, Clone)]
pub struct Section {
    pub radius: Length,
    pub chord: Length,
    pub twist: Angle,
    pub airfoil: Arc<Airfoil>,
}

impl Section {
    pub fn new(radius: Length, chord: Length, twist: Angle, airfoil: Arc<Airfoil>) -> Self {
        Self {
            radius,
            chord,
            twist,
            airfoil,
        }
    }
}

/// Errors that can occur while building a [`Rotor`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// Hub and tip radii are not ordered as `0 <= hub < tip`.
    #[error("invalid radii: hub={hub} m, tip={tip} m")]
    InvalidRadii { hub: f64, tip: f64 },

    /// The blade has no sections.
    #[error("blade has no sections")]
    NoSections,

    /// A section lies outside `[hub, tip]` or at the rotation axis.
    #[error("section {index} at r={radius} m is outside [{hub}, {tip}] m")]
    SectionOutOfBounds {
        index: usize,
        radius: f64,
        hub: f64,
        tip: f64,
    },

    /// Section radii decrease from root to tip.
    #[error("section {index} radius decreases along the span")]
    NonMonotonic { index: usize },

    /// A section chord is not strictly positive.
    #[error("section {index} chord must be positive, got {chord} m")]
    InvalidChord { index: usize, chord: f64 },

    /// A section twist is not finite.
    #[error("section {index} twist is not finite")]
    InvalidTwist { index: usize },

    /// Tilt or precone is not finite.
    #[error("rotor {0} angle is not finite")]
    InvalidAngle(&'static str),
}

/// Rotor geometry shared by every solve.
///
/// Immutable once built; solvers take it behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct Rotor {
    blades: usize,
    hub_radius: Length,
    tip_radius: Length,
    tilt: Angle,
    precone: Angle,
    sections: Vec<Section>,
}

impl Rotor {
    /// Builds a rotor with zero shaft tilt and zero precone.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the radii are not ordered as
    /// `0 <= hub < tip`, the section list is empty, a section radius is
    /// outside `[hub, tip]` (or zero), radii decrease along the span, or a
    /// chord is not strictly positive.
    pub fn new(
        blades: Constrained<usize, StrictlyPositive>,
        hub_radius: Length,
        tip_radius: Length,
        sections: Vec<Section>,
    ) -> Result<Self, GeometryError> {
        let hub = hub_radius.get::<meter>();
        let tip = tip_radius.get::<meter>();

        if !(hub.is_finite() && tip.is_finite() && hub >= 0.0 && hub < tip) {
            return Err(GeometryError::InvalidRadii { hub, tip });
        }

        if sections.is_empty() {
            return Err(GeometryError::NoSections);
        }

        let mut previous = hub;
        for (index, section) in sections.iter().enumerate() {
            let radius = section.radius.get::<meter>();
            if !(radius > 0.0 && radius >= hub && radius <= tip) {
                return Err(GeometryError::SectionOutOfBounds {
                    index,
                    radius,
                    hub,
                    tip,
                });
            }
            if radius < previous {
                return Err(GeometryError::NonMonotonic { index });
            }
            previous = radius;

            let chord = section.chord.get::<meter>();
            if !(chord.is_finite() && chord > 0.0) {
                return Err(GeometryError::InvalidChord { index, chord });
            }
            if !section.twist.get::<radian>().is_finite() {
                return Err(GeometryError::InvalidTwist { index });
            }
        }

        Ok(Self {
            blades: blades.into_inner(),
            hub_radius,
            tip_radius,
            tilt: Angle::ZERO,
            precone: Angle::ZERO,
            sections,
        })
    }

    /// Returns this rotor with the given shaft tilt angle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidAngle`] if `tilt` is not finite.
    pub fn with_tilt(mut self, tilt: Angle) -> Result<Self, GeometryError> {
        if !tilt.get::<radian>().is_finite() {
            return Err(GeometryError::InvalidAngle("tilt"));
        }
        self.tilt = tilt;
        Ok(self)
    }

    /// Returns this rotor with the given blade precone angle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidAngle`] if `precone` is not finite.
    pub fn with_precone(mut self, precone: Angle) -> Result<Self, GeometryError> {
        if !precone.get::<radian>().is_finite() {
            return Err(GeometryError::InvalidAngle("precone"));
        }
        self.precone = precone;
        Ok(self)
    }

    #[must_use]
    pub fn blades(&self) -> usize {
        self.blades
    }

    #[must_use]
    pub fn hub_radius(&self) -> Length {
        self.hub_radius
    }

    #[must_use]
    pub fn tip_radius(&self) -> Length {
        self.tip_radius
    }

    #[must_use]
    pub fn tilt(&self) -> Angle {
        self.tilt
    }

    #[must_use]
    pub fn precone(&self) -> Angle {
        self.precone
    }

    /// Sections ordered from root to tip.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}
