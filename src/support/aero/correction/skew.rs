/// Burton's wake skew angle model.
///
/// `χ = (1 + 0.6 a) γ`, where `a` is the mean axial induction of the annulus
/// and `γ` the yaw angle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BurtonSkew;

impl BurtonSkew {
    /// Wake skew angle in radians.
    #[must_use]
    pub fn wake_skew(&self, axial_induction: f64, yaw: f64) -> f64 {
        (0.6 * axial_induction + 1.0) * yaw
    }
}
