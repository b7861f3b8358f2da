//! Blade element momentum rotor model.
//!
//! This module provides a [`twine_core::Model`] implementation for
//! [`BemSolver`]. The computational core is in the internal `core` module.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use twine_bem::{
//!     models::aero::bem::{BemSolver, OperatingCondition, SolverConfig},
//!     support::{
//!         aero::{Airfoil, CorrectionChain, Extrapolation, PolarTable, Rotor, Section},
//!         constraint::StrictlyPositive,
//!     },
//! };
//! use twine_core::Model;
//! use uom::si::{
//!     angle::degree,
//!     angular_velocity::radian_per_second,
//!     f64::{Angle, AngularVelocity, Length, Velocity},
//!     length::meter,
//!     velocity::meter_per_second,
//! };
//!
//! let polar = PolarTable::from_degrees(&[
//!     (-10.0, -0.8, 0.02),
//!     (0.0, 0.3, 0.01),
//!     (10.0, 1.2, 0.02),
//!     (20.0, 1.0, 0.2),
//! ])?
//! .with_extrapolation(Extrapolation::Clamp);
//! let airfoil = Arc::new(Airfoil::new("thin", polar));
//!
//! let sections = [(4.0, 1.0, 10.0), (8.0, 0.8, 5.0), (12.0, 0.6, 2.0)]
//!     .into_iter()
//!     .map(|(r, c, twist)| {
//!         Section::new(
//!             Length::new::<meter>(r),
//!             Length::new::<meter>(c),
//!             Angle::new::<degree>(twist),
//!             Arc::clone(&airfoil),
//!         )
//!     })
//!     .collect();
//! let rotor = Rotor::new(
//!     StrictlyPositive::new(3)?,
//!     Length::new::<meter>(1.5),
//!     Length::new::<meter>(13.0),
//!     sections,
//! )?;
//!
//! let solver = BemSolver::new(
//!     Arc::new(rotor),
//!     CorrectionChain::from_ids(&["prandtl"])?,
//!     SolverConfig::default(),
//! )?;
//!
//! let loads = solver.call(&OperatingCondition::new(
//!     Velocity::new::<meter_per_second>(8.0),
//!     AngularVelocity::new::<radian_per_second>(4.2),
//!     Angle::new::<degree>(0.0),
//! ))?;
//! assert_eq!(loads.sections.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod core;

pub use self::core::{
    BemSolver, Breakdown, ConfigError, ConvergenceError, CoupledConfig, Cycle, Loads,
    ModelVariant, OperatingCondition, Regime, SectionLoads, SolveError, SolverConfig, StepError,
};

use twine_core::Model;

impl Model for BemSolver {
    type Input = OperatingCondition;
    type Output = Loads;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.steady(input)
    }
}
