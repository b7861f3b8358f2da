use crate::support::aero::momentum::thrust_coefficient;

/// Buhl's empirical high-induction thrust correction.
///
/// Above the critical induction `beta`, momentum theory is replaced by a
/// quadratic in `a` that matches the momentum thrust coefficient and its
/// slope at `beta` and reaches `2 cos χ` at `a = 1`.
///
/// Both induction solvers use it in place of
/// [`SolverConfig::breakdown`](crate::models::aero::bem::SolverConfig::breakdown).
/// The uncoupled solver has no wake skew, so it evaluates the quadratic at
/// `χ = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuhlThrust {
    /// Critical axial induction where the quadratic takes over.
    pub beta: f64,

    /// Step of the central difference used for the slope at `beta`.
    pub da: f64,
}

impl Default for BuhlThrust {
    fn default() -> Self {
        Self {
            beta: 0.4,
            da: 0.02,
        }
    }
}

impl BuhlThrust {
    /// Thrust coefficient for axial induction `a`, loss factor `loss` and
    /// wake skew angle `skew` (radians).
    #[must_use]
    pub fn thrust(&self, a: f64, loss: f64, skew: f64) -> f64 {
        let [k0, k1, k2] = self.coefficients(loss, skew);
        k0 + k1 * a + k2 * a * a
    }

    /// Axial induction at which the quadratic for an aligned wake equals the
    /// blade element thrust `4 F κ (1 - a)²`.
    ///
    /// Meant for `κ` above `beta / (1 - beta)`, where the result lies in
    /// `[beta, 1]`.
    #[must_use]
    pub fn axial_induction(&self, kappa: f64, loss: f64) -> f64 {
        let [k0, k1, k2] = self.coefficients(loss, 0.0);
        let element = 4.0 * loss * kappa;

        // A a² - B a + C = 0, smaller root in a form that stays finite as A -> 0.
        let a2 = element - k2;
        let b = k1 + 2.0 * element;
        let c = element - k0;
        2.0 * c / (b + (b * b - 4.0 * a2 * c).max(0.0).sqrt())
    }

    /// Coefficients `[k0, k1, k2]` of the quadratic in `a`.
    fn coefficients(&self, loss: f64, skew: f64) -> [f64; 3] {
        let beta = self.beta;
        let f0 = thrust_coefficient(beta, loss, skew);
        let fp0 = (thrust_coefficient(beta + self.da, loss, skew)
            - thrust_coefficient(beta - self.da, loss, skew))
            / (2.0 * self.da);
        let f1 = 2.0 * skew.cos();

        let k2 = (f1 - f0 - fp0 * (1.0 - beta)) / (1.0 - beta).powi(2);
        let k1 = fp0 - 2.0 * k2 * beta;
        let k0 = f1 - k1 - k2;
        [k0, k1, k2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn continuous_with_momentum_at_beta() {
        let model = BuhlThrust::default();
        for loss in [0.6, 0.9, 1.0] {
            assert_relative_eq!(
                model.thrust(model.beta, loss, 0.1),
                thrust_coefficient(model.beta, loss, 0.1),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn reaches_two_at_full_induction() {
        let model = BuhlThrust::default();
        assert_relative_eq!(model.thrust(1.0, 1.0, 0.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(model.thrust(1.0, 0.7, 0.3), 2.0 * 0.3_f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn exceeds_momentum_beyond_beta() {
        let model = BuhlThrust::default();
        // Momentum theory predicts falling thrust past a = 0.5; measurements do not.
        assert!(model.thrust(0.7, 1.0, 0.0) > thrust_coefficient(0.7, 1.0, 0.0));
    }

    #[test]
    fn induction_balances_blade_element_thrust() {
        let model = BuhlThrust::default();

        let kappa = model.beta / (1.0 - model.beta);
        assert_relative_eq!(model.axial_induction(kappa, 1.0), model.beta, epsilon = 1e-9);

        for (kappa, loss) in [(1.0, 1.0), (2.5, 0.8), (8.0, 0.6)] {
            let a = model.axial_induction(kappa, loss);
            assert!(a > model.beta && a < 1.0, "{a}");
            assert_relative_eq!(
                model.thrust(a, loss, 0.0),
                4.0 * loss * kappa * (1.0 - a).powi(2),
                epsilon = 1e-9
            );
        }
    }
}
