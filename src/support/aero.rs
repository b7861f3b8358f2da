//! Aerodynamic inputs for blade element models.
//!
//! - [`polar`]: Airfoil lift/drag tables with interpolated lookup.
//! - [`blade`]: Rotor geometry built from blade sections.
//! - [`correction`]: Secondary corrections applied by the induction solvers.
//! - [`momentum`]: Actuator-disk momentum relations.
//!
//! All types here are immutable once built and can be shared across threads.

pub mod blade;
pub mod correction;
pub mod momentum;
pub mod polar;

pub use blade::{Airfoil, GeometryError, Rotor, Section};
pub use correction::{
    Correction, CorrectionChain, CorrectionError, CorrectionKind, Induction, Station,
};
pub use polar::{
    Coefficients, Extrapolation, OutOfRangeError, PolarSample, PolarTable, PolarTableError,
};
