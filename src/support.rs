//! Supporting utilities used by the BEM models.
//!
//! - [`aero`]: Rotor geometry, airfoil polars and secondary corrections.
//! - [`constraint`]: Numeric invariants enforced at construction time.
//! - [`units`]: Extensions to [`uom`].

pub mod aero;
pub mod constraint;
pub mod units;
