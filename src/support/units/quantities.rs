use uom::{
    si::{ISQ, Quantity, SI},
    typenum::{N2, P1, Z0},
};

/// Force per unit length, N/m in SI.
///
/// Dimensionally identical to surface tension (kg/s²); used here for blade
/// loads per unit span.
pub type LinearForce = Quantity<ISQ<Z0, P1, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;
