use std::sync::Arc;

use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::{angle::radian, f64::Angle};

use crate::support::aero::{CorrectionError, OutOfRangeError};

/// Errors raised while building a solver.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid correction chain")]
    Correction(#[from] CorrectionError),

    /// A solver setting is out of range.
    #[error("invalid solver setting `{field}`: {reason}")]
    Solver {
        field: &'static str,
        reason: &'static str,
    },
}

/// The induction iteration did not produce a solution.
///
/// Cloneable so that a failed sweep can be reported at every azimuth it
/// covers.
#[derive(Debug, Clone, Error)]
pub enum ConvergenceError {
    /// The residual does not change sign on any candidate inflow interval.
    #[error("no inflow angle interval brackets a root")]
    NoBracket,

    /// The velocity triangle or the loads are not finite, as for a stopped
    /// rotor in aligned flow.
    #[error("degenerate inflow: velocity triangle or loads are not finite")]
    DegenerateInflow,

    /// The local solver reached its iteration limit.
    #[error("solver hit iteration limit: residual={residual:e}")]
    MaxIters {
        /// Largest residual magnitude at the last iterate.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// The finite-difference Jacobian of the coupled residuals is singular.
    #[error("singular jacobian after {iters} iterations")]
    SingularJacobian { iters: usize },

    /// The harmonic induction state of a sweep did not settle.
    #[error("azimuth sweep did not converge: change={change:e}")]
    SweepMaxIters {
        /// Largest harmonic coefficient change of the last sweep.
        change: f64,

        /// Outer iteration count.
        iters: usize,
    },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[source] Arc<bisection::Error>),
}

impl From<bisection::Error> for ConvergenceError {
    fn from(err: bisection::Error) -> Self {
        Self::Bisection(Arc::new(err))
    }
}

/// Errors of a single section solve, before the section is known to the caller.
#[derive(Debug, Clone, Error)]
pub(crate) enum SectionError {
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
}

impl SectionError {
    /// Attaches the section index and azimuth (radians).
    pub(crate) fn at(self, section: usize, azimuth: f64) -> SolveError {
        let azimuth = Angle::new::<radian>(azimuth);
        match self {
            Self::OutOfRange(source) => SolveError::OutOfRange {
                section,
                azimuth,
                source,
            },
            Self::Convergence(source) => SolveError::Convergence {
                section,
                azimuth,
                source,
            },
        }
    }
}

/// Errors that can occur while solving the rotor at one operating condition.
#[derive(Debug, Clone, Error)]
pub enum SolveError {
    /// A polar lookup left the tabulated range.
    #[error("section {section} at azimuth {azimuth:?}: polar lookup out of range")]
    OutOfRange {
        section: usize,
        azimuth: Angle,
        #[source]
        source: OutOfRangeError,
    },

    /// The induction solve did not converge.
    #[error("section {section} at azimuth {azimuth:?}: induction did not converge")]
    Convergence {
        section: usize,
        azimuth: Angle,
        #[source]
        source: ConvergenceError,
    },

    /// A requested section index is past the end of the rotor.
    #[error("section {section} requested from a rotor with {count} sections")]
    NoSuchSection { section: usize, count: usize },
}

impl SolveError {
    /// Index of the failing or missing section.
    #[must_use]
    pub fn section(&self) -> usize {
        match self {
            Self::OutOfRange { section, .. }
            | Self::Convergence { section, .. }
            | Self::NoSuchSection { section, .. } => *section,
        }
    }
}

/// A failed step of a time-marching sequence.
#[derive(Debug, Error)]
#[error("time step {step} failed")]
pub struct StepError {
    /// Index of the step in the input sequence.
    pub step: usize,

    #[source]
    pub source: SolveError,
}
