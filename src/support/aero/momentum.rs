//! Actuator-disk momentum relations shared by the solvers and corrections.

/// Thrust coefficient from momentum theory for a skewed wake.
///
/// `CT = 4 a F sqrt(1 - a (2 cos(chi) - a))`, which reduces to the familiar
/// `4 a F (1 - a)` for an aligned wake and `a <= 1`.
///
/// # Parameters
///
/// - `a`: Axial induction factor.
/// - `loss`: Hub/tip loss factor `F`.
/// - `skew`: Wake skew angle, radians.
#[must_use]
pub fn thrust_coefficient(a: f64, loss: f64, skew: f64) -> f64 {
    4.0 * a * loss * (1.0 - a * (2.0 * skew.cos() - a)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn aligned_wake_matches_classic_momentum() {
        for a in [0.0, 0.1, 0.25, 1.0 / 3.0, 0.4] {
            assert_relative_eq!(
                thrust_coefficient(a, 1.0, 0.0),
                4.0 * a * (1.0 - a),
                epsilon = 1e-14
            );
        }
        // Betz optimum.
        assert_relative_eq!(thrust_coefficient(1.0 / 3.0, 1.0, 0.0), 8.0 / 9.0, epsilon = 1e-14);
    }

    #[test]
    fn scales_with_loss_factor() {
        let ct = thrust_coefficient(0.3, 1.0, 0.2);
        assert_relative_eq!(thrust_coefficient(0.3, 0.5, 0.2), 0.5 * ct, epsilon = 1e-14);
    }
}
