//! Induction factor solvers after Ning (2014).
//!
//! - [`uncoupled`]: one root find on the inflow angle per section and azimuth.
//! - [`coupled`]: skewed-wake residuals in `(a, a')`, coupled across azimuths.

pub(crate) mod coupled;
pub(crate) mod uncoupled;
