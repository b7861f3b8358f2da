//! Secondary corrections for blade element momentum solvers.
//!
//! A [`CorrectionChain`] is an ordered list of [`Correction`]s chosen by
//! configuration. Each correction acts at one stage of a solve:
//!
//! | id            | stage                                               |
//! |---------------|-----------------------------------------------------|
//! | `prandtl`     | hub/tip loss factor in the momentum balance         |
//! | `burton`      | wake skew angle from yaw                            |
//! | `pitt-peters` | axial induction after the local solve               |
//! | `buhl`        | high-induction thrust, replacing the solver's breakdown branch |
//! | `knudsen`     | dynamic inflow filter while time marching           |
//!
//! An empty chain applies no secondary effect at all: the loss factor is 1,
//! the wake skew angle equals the yaw angle and induction factors pass
//! through unchanged.
//!
//! Within a stage, corrections are applied in the order they are listed.
//! Corrections are pure functions of their inputs, so a chain can be shared
//! by every section and azimuth of a solve.
//!
//! ```
//! use twine_bem::support::aero::{CorrectionChain, CorrectionKind};
//!
//! let chain = CorrectionChain::from_ids(&["prandtl", "burton", "pitt-peters"]).unwrap();
//! assert!(chain.contains(CorrectionKind::PittPeters));
//!
//! assert!(CorrectionChain::from_ids(&["pitt-peters", "burton"]).is_err());
//! assert!(CorrectionChain::from_ids(&["glauert"]).is_err());
//! ```

mod buhl;
mod knudsen;
mod pitt_peters;
mod prandtl;
mod skew;

use std::{fmt, str::FromStr};

use thiserror::Error;

pub use buhl::BuhlThrust;
pub use knudsen::Knudsen;
pub use pitt_peters::PittPeters;
pub use prandtl::PrandtlLoss;
pub use skew::BurtonSkew;

/// Identifier of a correction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrectionKind {
    PrandtlLoss,
    BurtonSkew,
    PittPeters,
    BuhlThrust,
    Knudsen,
}

impl CorrectionKind {
    /// Every correction, in dispatch-table order.
    pub const ALL: [Self; 5] = [
        Self::PrandtlLoss,
        Self::BurtonSkew,
        Self::PittPeters,
        Self::BuhlThrust,
        Self::Knudsen,
    ];

    /// Configuration identifier of this correction.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::PrandtlLoss => "prandtl",
            Self::BurtonSkew => "burton",
            Self::PittPeters => "pitt-peters",
            Self::BuhlThrust => "buhl",
            Self::Knudsen => "knudsen",
        }
    }
}

impl fmt::Display for CorrectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CorrectionKind {
    type Err = CorrectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| CorrectionError::Unknown(s.to_owned()))
    }
}

/// Errors that can occur while building a [`CorrectionChain`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    /// The identifier does not name a known correction.
    #[error("unknown correction `{0}`")]
    Unknown(String),

    /// The same correction appears more than once.
    #[error("correction `{0}` listed more than once")]
    Duplicate(CorrectionKind),

    /// Two corrections are listed in an order that cannot be applied.
    #[error("correction `{first}` must come after `{then}`")]
    IncompatibleOrder {
        /// The correction listed too early.
        first: CorrectionKind,

        /// The correction it depends on.
        then: CorrectionKind,
    },
}

/// Where and when a correction is evaluated.
///
/// All lengths are in meters and all angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    pub radius: f64,
    pub hub_radius: f64,
    pub tip_radius: f64,
    pub blades: usize,
    pub azimuth: f64,
    pub yaw: f64,

    /// Wake skew angle produced by the chain's skew stage.
    pub wake_skew: f64,
}

/// Axial and tangential induction factors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Induction {
    pub axial: f64,
    pub tangential: f64,
}

/// A configured correction model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    PrandtlLoss(PrandtlLoss),
    BurtonSkew(BurtonSkew),
    PittPeters(PittPeters),
    BuhlThrust(BuhlThrust),
    Knudsen(Knudsen),
}

impl Correction {
    #[must_use]
    pub fn kind(&self) -> CorrectionKind {
        match self {
            Self::PrandtlLoss(_) => CorrectionKind::PrandtlLoss,
            Self::BurtonSkew(_) => CorrectionKind::BurtonSkew,
            Self::PittPeters(_) => CorrectionKind::PittPeters,
            Self::BuhlThrust(_) => CorrectionKind::BuhlThrust,
            Self::Knudsen(_) => CorrectionKind::Knudsen,
        }
    }

    /// Adjusts induction factors after the local solve.
    ///
    /// Only [`PittPeters`] acts at this stage; every other correction
    /// returns the state unchanged.
    #[must_use]
    pub fn apply(&self, station: &Station, state: Induction) -> Induction {
        match self {
            Self::PittPeters(model) => Induction {
                axial: model.axial_induction(state.axial, station),
                ..state
            },
            _ => state,
        }
    }
}

/// Builds a correction with its default parameters.
impl From<CorrectionKind> for Correction {
    fn from(kind: CorrectionKind) -> Self {
        match kind {
            CorrectionKind::PrandtlLoss => Self::PrandtlLoss(PrandtlLoss::default()),
            CorrectionKind::BurtonSkew => Self::BurtonSkew(BurtonSkew),
            CorrectionKind::PittPeters => Self::PittPeters(PittPeters::default()),
            CorrectionKind::BuhlThrust => Self::BuhlThrust(BuhlThrust::default()),
            CorrectionKind::Knudsen => Self::Knudsen(Knudsen::default()),
        }
    }
}

/// An ordered, validated list of corrections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionChain {
    corrections: Vec<Correction>,
}

impl CorrectionChain {
    /// A chain with no corrections.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a chain from configured corrections.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::Duplicate`] if a correction appears twice, or
    /// [`CorrectionError::IncompatibleOrder`] if `pitt-peters` comes before
    /// `burton` or `knudsen` comes before `pitt-peters`.
    pub fn new(corrections: Vec<Correction>) -> Result<Self, CorrectionError> {
        let position = |kind: CorrectionKind| corrections.iter().position(|c| c.kind() == kind);

        for (index, correction) in corrections.iter().enumerate() {
            if position(correction.kind()) != Some(index) {
                return Err(CorrectionError::Duplicate(correction.kind()));
            }
        }

        // (consumer, producer): the consumer reads what the producer computes.
        let dependencies = [
            (CorrectionKind::PittPeters, CorrectionKind::BurtonSkew),
            (CorrectionKind::Knudsen, CorrectionKind::PittPeters),
        ];
        for (consumer, producer) in dependencies {
            if let (Some(c), Some(p)) = (position(consumer), position(producer)) {
                if c < p {
                    return Err(CorrectionError::IncompatibleOrder {
                        first: consumer,
                        then: producer,
                    });
                }
            }
        }

        Ok(Self { corrections })
    }

    /// Builds a chain from configuration identifiers, using default
    /// parameters for every correction.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::Unknown`] for an unrecognized identifier, and
    /// the errors of [`CorrectionChain::new`].
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Result<Self, CorrectionError> {
        let corrections = ids
            .iter()
            .map(|id| id.as_ref().parse::<CorrectionKind>().map(Correction::from))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(corrections)
    }

    #[must_use]
    pub fn corrections(&self) -> &[Correction] {
        &self.corrections
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    #[must_use]
    pub fn contains(&self, kind: CorrectionKind) -> bool {
        self.corrections.iter().any(|c| c.kind() == kind)
    }

    /// Hub/tip loss factor `F` at an inflow angle (radians); 1 without a loss model.
    #[must_use]
    pub fn loss_factor(&self, station: &Station, inflow_angle: f64) -> f64 {
        self.corrections.iter().fold(1.0, |f, c| match c {
            Correction::PrandtlLoss(model) => f * model.factor(station, inflow_angle),
            _ => f,
        })
    }

    /// Wake skew angle (radians) for a yaw angle; the yaw angle itself without a skew model.
    #[must_use]
    pub fn wake_skew(&self, axial_induction: f64, yaw: f64) -> f64 {
        self.corrections.iter().fold(yaw, |chi, c| match c {
            Correction::BurtonSkew(model) => model.wake_skew(axial_induction, chi),
            _ => chi,
        })
    }

    /// The high-induction thrust model, if the chain has one.
    #[must_use]
    pub fn high_induction(&self) -> Option<&BuhlThrust> {
        self.corrections.iter().find_map(|c| match c {
            Correction::BuhlThrust(model) => Some(model),
            _ => None,
        })
    }

    /// The dynamic inflow model, if the chain has one.
    #[must_use]
    pub fn dynamic_inflow(&self) -> Option<&Knudsen> {
        self.corrections.iter().find_map(|c| match c {
            Correction::Knudsen(model) => Some(model),
            _ => None,
        })
    }

    /// Applies every correction's post-solve stage in list order.
    #[must_use]
    pub fn apply(&self, station: &Station, state: Induction) -> Induction {
        self.corrections
            .iter()
            .fold(state, |state, c| c.apply(station, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn station() -> Station {
        Station {
            radius: 1.5,
            hub_radius: 0.2,
            tip_radius: 2.0,
            blades: 3,
            azimuth: std::f64::consts::FRAC_PI_2,
            yaw: 0.3,
            wake_skew: 0.3,
        }
    }

    #[test]
    fn parses_every_identifier() {
        for kind in CorrectionKind::ALL {
            assert_eq!(kind.id().parse::<CorrectionKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.id());
        }
        assert_eq!(
            "tip".parse::<CorrectionKind>().unwrap_err(),
            CorrectionError::Unknown("tip".into())
        );
    }

    #[test]
    fn empty_chain_has_no_effect() {
        let chain = CorrectionChain::empty();
        let s = station();
        let state = Induction {
            axial: 0.3,
            tangential: 0.01,
        };

        assert_eq!(chain.loss_factor(&s, 0.1), 1.0);
        assert_eq!(chain.wake_skew(0.3, 0.2), 0.2);
        assert_eq!(chain.apply(&s, state), state);
        assert!(chain.high_induction().is_none());
        assert!(chain.dynamic_inflow().is_none());
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            CorrectionChain::from_ids(&["prandtl", "burton", "prandtl"]).unwrap_err(),
            CorrectionError::Duplicate(CorrectionKind::PrandtlLoss)
        );
    }

    #[test]
    fn rejects_incompatible_order() {
        assert_eq!(
            CorrectionChain::from_ids(&["pitt-peters", "burton"]).unwrap_err(),
            CorrectionError::IncompatibleOrder {
                first: CorrectionKind::PittPeters,
                then: CorrectionKind::BurtonSkew,
            }
        );
        assert_eq!(
            CorrectionChain::from_ids(&["knudsen", "pitt-peters"]).unwrap_err(),
            CorrectionError::IncompatibleOrder {
                first: CorrectionKind::Knudsen,
                then: CorrectionKind::PittPeters,
            }
        );
        assert!(CorrectionChain::from_ids(&["burton", "pitt-peters", "knudsen"]).is_ok());
        // Without the producer the consumer uses the fallback value.
        assert!(CorrectionChain::from_ids(&["pitt-peters"]).is_ok());
    }

    #[test]
    fn applies_stages_from_the_chain() {
        let chain = CorrectionChain::from_ids(&["prandtl", "burton", "pitt-peters", "buhl"]).unwrap();
        let s = station();

        let f = chain.loss_factor(&s, 0.2);
        assert!(f > 0.0 && f < 1.0);

        assert_relative_eq!(chain.wake_skew(0.25, 0.3), (0.6 * 0.25 + 1.0) * 0.3);

        let adjusted = chain.apply(
            &s,
            Induction {
                axial: 0.3,
                tangential: 0.01,
            },
        );
        assert!(adjusted.axial > 0.3);
        assert_eq!(adjusted.tangential, 0.01);

        assert!(chain.high_induction().is_some());
    }
}
