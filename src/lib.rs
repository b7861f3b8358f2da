//! # Twine BEM
//!
//! Blade element momentum (BEM) rotor models for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! Given a rotor geometry, airfoil polars and an operating condition, the
//! models in this crate solve the axial and tangential induction factors of
//! every blade section and return the sectional aerodynamic loads.
//!
//! ## Crate layout
//!
//! - [`models`]: BEM solvers and their [`twine_core::Model`] adapters.
//! - [`support`]: Rotor geometry, airfoil polars, secondary corrections and
//!   other utilities used by the models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because models need
//! callers to build rotors, polars and correction chains, but their APIs are
//! not stable. Breaking changes may occur as needed.
//!
//! Solver internals live in each model's private `core` module. Only the
//! types re-exported from the model module are public.

pub mod models;
pub mod support;
