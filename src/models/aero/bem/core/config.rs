use twine_solvers::equation::bisection;

use super::{ConfigError, momentum::Breakdown};

/// Induction solver formulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelVariant {
    /// Each section and azimuth solved independently on the inflow angle.
    #[default]
    Uncoupled,

    /// Skewed-wake model: `(a, a')` solved per azimuth and coupled across the
    /// revolution through a harmonic induction state.
    Coupled,
}

/// Solver configuration for [`BemSolver`](super::BemSolver).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub model: ModelVariant,

    /// Empirical branch used when momentum theory breaks down.
    pub breakdown: Breakdown,

    /// Distance (radians) kept from the singular inflow angles `0` and `π`
    /// when bracketing the uncoupled residual.
    pub bracket_epsilon: f64,

    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the inflow angle, radians.
    pub angle_tol: f64,

    /// Absolute tolerance on the uncoupled residual.
    pub residual_tol: f64,

    /// Settings of the coupled model, unused by the uncoupled one.
    pub coupled: CoupledConfig,

    /// Solve sections (and sweep azimuths) on the rayon thread pool.
    ///
    /// Results do not depend on this setting.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            model: ModelVariant::default(),
            breakdown: Breakdown::default(),
            bracket_epsilon: 1e-5,
            max_iters: 100,
            angle_tol: 1e-12,
            residual_tol: 1e-12,
            coupled: CoupledConfig::default(),
            parallel: true,
        }
    }
}

/// Settings of the coupled model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoupledConfig {
    /// Half width of the box around the uncoupled solution that confines the
    /// local `(a, a')` solve.
    pub search_radius: f64,

    /// Convergence threshold on the largest local residual.
    pub residual_tol: f64,

    /// Maximum Newton iterations of one local solve.
    pub max_iters: usize,

    /// Step of the forward-difference Jacobian.
    pub fd_step: f64,

    /// Azimuth count of the sweep used by steady evaluations.
    pub sweep_azimuths: usize,

    /// Maximum outer iterations of a sweep.
    pub max_outer_iters: usize,

    /// Convergence threshold on the largest change of a harmonic coefficient
    /// between two sweeps.
    pub outer_tol: f64,
}

impl Default for CoupledConfig {
    fn default() -> Self {
        Self {
            search_radius: 0.2,
            residual_tol: 1e-9,
            max_iters: 50,
            fd_step: 1e-7,
            sweep_azimuths: 36,
            max_outer_iters: 50,
            outer_tol: 1e-8,
        }
    }
}

impl SolverConfig {
    /// Shorthand for the default configuration with the coupled model.
    #[must_use]
    pub fn coupled() -> Self {
        Self {
            model: ModelVariant::Coupled,
            ..Self::default()
        }
    }

    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Solver`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        let check = |ok: bool, field: &'static str, reason: &'static str| {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Solver { field, reason })
            }
        };

        check(
            positive(self.bracket_epsilon) && self.bracket_epsilon < std::f64::consts::FRAC_PI_4,
            "bracket_epsilon",
            "must be in (0, π/4)",
        )?;
        check(self.max_iters > 0, "max_iters", "must be positive")?;
        check(positive(self.angle_tol), "angle_tol", "must be positive")?;
        check(positive(self.residual_tol), "residual_tol", "must be positive")?;

        if let Breakdown::Spera { critical_induction } = self.breakdown {
            check(
                critical_induction > 0.0 && critical_induction < 0.5,
                "breakdown.critical_induction",
                "must be in (0, 0.5)",
            )?;
        }

        let coupled = &self.coupled;
        check(
            positive(coupled.search_radius),
            "coupled.search_radius",
            "must be positive",
        )?;
        check(
            positive(coupled.residual_tol),
            "coupled.residual_tol",
            "must be positive",
        )?;
        check(coupled.max_iters > 0, "coupled.max_iters", "must be positive")?;
        check(positive(coupled.fd_step), "coupled.fd_step", "must be positive")?;
        check(
            coupled.sweep_azimuths >= 3,
            "coupled.sweep_azimuths",
            "must be at least 3",
        )?;
        check(
            coupled.max_outer_iters > 0,
            "coupled.max_outer_iters",
            "must be positive",
        )?;
        check(positive(coupled.outer_tol), "coupled.outer_tol", "must be positive")
    }

    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.angle_tol,
            x_rel_tol: 0.0,
            residual_tol: self.residual_tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(SolverConfig::coupled().validate().is_ok());
    }

    #[test]
    fn names_the_invalid_field() {
        let config = SolverConfig {
            angle_tol: 0.0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Solver {
                field: "angle_tol",
                ..
            })
        ));

        let config = SolverConfig {
            coupled: CoupledConfig {
                sweep_azimuths: 2,
                ..CoupledConfig::default()
            },
            ..SolverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Solver {
                field: "coupled.sweep_azimuths",
                ..
            })
        ));
    }

    #[test]
    fn rejects_spera_threshold_out_of_range() {
        let config = SolverConfig {
            breakdown: Breakdown::Spera {
                critical_induction: 0.6,
            },
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SolverConfig {
            breakdown: Breakdown::Spera {
                critical_induction: 0.2,
            },
            ..SolverConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
