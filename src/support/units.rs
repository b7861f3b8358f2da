//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical quantities at its public boundary
//! (lengths, angles, speeds, densities). Sectional blade loads are forces per
//! unit span, a quantity [`uom`] does not name, so it is defined here.
//!
//! ```
//! use twine_bem::support::units::{LinearForce, LinearForceExt};
//!
//! let load = LinearForce::from_newtons_per_meter(410.0);
//! assert_eq!(load.newtons_per_meter(), 410.0);
//! ```

mod linear_force;
mod quantities;

pub use linear_force::LinearForceExt;
pub use quantities::LinearForce;
