/// Knudsen dynamic inflow model.
///
/// A first-order filter that lets the axial induction lag behind its
/// quasi-steady value: `ã ← ã + Δt κ (a - ã)` with
/// `κ = max(1 m/s, U_x) / (τ r)`.
///
/// The filter state is owned by the caller and lives for one time-marching
/// sequence; outside time marching the model has no effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knudsen {
    /// Filtered axial induction at the first time step.
    pub initial: f64,

    /// Time constant scale `τ`, in rotor radii per unit axial velocity.
    pub tau_scale: f64,
}

impl Default for Knudsen {
    fn default() -> Self {
        Self {
            initial: 0.3,
            tau_scale: 3.0,
        }
    }
}

impl Knudsen {
    /// Advances the filtered axial induction by one time step.
    ///
    /// # Parameters
    ///
    /// - `filtered`: Filtered induction after the previous step.
    /// - `quasi_steady`: Induction solved for the current step.
    /// - `axial_velocity`: Axial inflow velocity at the section, m/s.
    /// - `radius`: Section radius, m.
    /// - `dt`: Time step, s.
    #[must_use]
    pub fn step(
        &self,
        filtered: f64,
        quasi_steady: f64,
        axial_velocity: f64,
        radius: f64,
        dt: f64,
    ) -> f64 {
        let kappa = axial_velocity.max(1.0) / (self.tau_scale * radius);
        filtered + dt * kappa * (quasi_steady - filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn relaxes_toward_quasi_steady_value() {
        let model = Knudsen::default();
        let mut a = model.initial;
        let mut previous_gap = (0.2_f64 - a).abs();

        for _ in 0..50 {
            a = model.step(a, 0.2, 10.0, 2.0, 0.1);
            let gap = (0.2_f64 - a).abs();
            assert!(gap < previous_gap);
            previous_gap = gap;
        }
        assert_relative_eq!(a, 0.2, epsilon = 1e-3);
    }

    #[test]
    fn holds_a_converged_value() {
        let model = Knudsen::default();
        assert_eq!(model.step(0.25, 0.25, 12.0, 1.5, 0.05), 0.25);
    }
}
