//! Azimuth sweep of the coupled model.
//!
//! The sweep owns the harmonic induction state of one section. Each outer
//! iteration reads a snapshot of that state, solves every azimuth against it
//! and only then replaces it, so azimuths never observe a partially updated
//! state.

use log::debug;
use uom::si::{angle::radian, length::meter};

use crate::{
    models::aero::bem::core::{
        ConvergenceError, OperatingCondition, SolverConfig, error::SectionError, map_collect,
        ning::uncoupled, section::{Local, Solution},
    },
    support::aero::{CorrectionChain, Induction, Rotor, Section},
};

use super::LocalProblem;

/// First-order Fourier representation of the axial induction over a
/// revolution: `a(ψ) ≈ mean + cosine cos ψ + sine sin ψ`.
///
/// Only `mean` feeds back into the local solves, through the wake skew
/// angle. `cosine` and `sine` take part in the convergence measure only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SweepState {
    pub mean: f64,
    pub cosine: f64,
    pub sine: f64,
}

impl SweepState {
    /// Discrete Fourier coefficients of values sampled on a uniform grid.
    pub(crate) fn fit(azimuths: &[f64], values: impl IntoIterator<Item = f64>) -> Self {
        let n = azimuths.len() as f64;
        let sums = azimuths
            .iter()
            .zip(values)
            .fold([0.0; 3], |[mean, cosine, sine], (psi, a)| {
                [mean + a, cosine + a * psi.cos(), sine + a * psi.sin()]
            });

        Self {
            mean: sums[0] / n,
            cosine: 2.0 * sums[1] / n,
            sine: 2.0 * sums[2] / n,
        }
    }

    /// Largest coefficient change between two states.
    pub(crate) fn change(&self, other: &Self) -> f64 {
        (self.mean - other.mean)
            .abs()
            .max((self.cosine - other.cosine).abs())
            .max((self.sine - other.sine).abs())
    }
}

/// Outer iteration of one section over a set of azimuths.
pub(crate) struct Sweep<'a> {
    rotor: &'a Rotor,
    section: &'a Section,
    condition: &'a OperatingCondition,
    chain: &'a CorrectionChain,
    config: &'a SolverConfig,
}

impl<'a> Sweep<'a> {
    pub(crate) fn new(
        rotor: &'a Rotor,
        section: &'a Section,
        condition: &'a OperatingCondition,
        chain: &'a CorrectionChain,
        config: &'a SolverConfig,
    ) -> Self {
        Self {
            rotor,
            section,
            condition,
            chain,
            config,
        }
    }

    fn local(&self, azimuth: f64) -> Local<'a> {
        Local::new(self.rotor, self.section, &self.condition.at_azimuth(azimuth))
    }

    /// Uncoupled solution at an azimuth, the starting point of the local solve.
    fn uncoupled(&self, local: &Local<'_>, azimuth: f64) -> Result<Induction, SectionError> {
        let inflow = self
            .condition
            .at_azimuth(azimuth)
            .inflow(self.rotor, local.radius());
        uncoupled::solve(local, inflow, self.chain, self.config).map(|s| s.induction)
    }

    fn problem<'p>(
        &self,
        local: &'p Local<'p>,
        wake_skew: f64,
    ) -> Result<LocalProblem<'p>, SectionError>
    where
        'a: 'p,
    {
        let hub = self.condition.hub_inflow(self.rotor, local.radius());
        LocalProblem::new(local, hub, wake_skew, self.chain, self.config)
    }

    /// Iterates until the harmonic state settles on the given azimuths
    /// (radians).
    ///
    /// Returns the converged state and one solution per azimuth.
    ///
    /// # Errors
    ///
    /// Returns the first failing azimuth's error, or
    /// [`ConvergenceError::SweepMaxIters`] if the state does not settle.
    pub(crate) fn converge(
        &self,
        azimuths: &[f64],
    ) -> Result<(SweepState, Vec<Solution>), SectionError> {
        let parallel = self.config.parallel;
        let settings = &self.config.coupled;
        let yaw = self.condition.yaw.get::<radian>();

        let locals: Vec<(f64, Local<'a>)> = azimuths
            .iter()
            .map(|&psi| (psi, self.local(psi)))
            .collect();

        let centers = map_collect(parallel, &locals, |(psi, local)| {
            self.uncoupled(local, *psi)
        })
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        let mut starts = centers.clone();
        let mut state = SweepState::fit(azimuths, centers.iter().map(|c| c.axial));
        let mut change = f64::INFINITY;

        for iter in 1..=settings.max_outer_iters {
            let snapshot = state;
            let wake_skew = self.chain.wake_skew(snapshot.mean, yaw);

            let indices: Vec<usize> = (0..locals.len()).collect();
            let solved = map_collect(parallel, &indices, |&k| -> Result<_, SectionError> {
                self.problem(&locals[k].1, wake_skew)?
                    .solve(starts[k], centers[k])
            })
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

            let (roots, solutions): (Vec<Induction>, Vec<Solution>) = solved.into_iter().unzip();
            let next = SweepState::fit(azimuths, solutions.iter().map(|s| s.induction.axial));

            change = snapshot.change(&next);
            state = next;
            starts = roots;

            debug!(
                "sweep r={:.3} m iter {iter}: mean a={:.5} skew={wake_skew:.4} change={change:.3e}",
                self.section.radius.get::<meter>(),
                state.mean
            );

            if change <= settings.outer_tol {
                return Ok((state, solutions));
            }
        }

        Err(ConvergenceError::SweepMaxIters {
            change,
            iters: settings.max_outer_iters,
        }
        .into())
    }

    /// Solves one azimuth (radians) against a converged state.
    ///
    /// # Errors
    ///
    /// Returns a [`SectionError`] if the uncoupled start or the local solve fails.
    pub(crate) fn solve_at(
        &self,
        state: &SweepState,
        azimuth: f64,
    ) -> Result<Solution, SectionError> {
        let local = self.local(azimuth);
        let center = self.uncoupled(&local, azimuth)?;
        let wake_skew = self
            .chain
            .wake_skew(state.mean, self.condition.yaw.get::<radian>());

        self.problem(&local, wake_skew)?
            .solve(center, center)
            .map(|(_, solution)| solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::TAU;

    use approx::assert_relative_eq;
    use uom::si::{angle::degree, f64::Angle};

    use crate::models::aero::bem::core::test_support::{condition, rotor};

    #[test]
    fn fits_first_harmonics() {
        let azimuths: Vec<f64> = (0..12).map(|k| TAU * f64::from(k) / 12.0).collect();
        let exact = SweepState {
            mean: 0.3,
            cosine: -0.02,
            sine: 0.05,
        };

        let at = |psi: f64| exact.mean + exact.cosine * psi.cos() + exact.sine * psi.sin();
        let fitted = SweepState::fit(&azimuths, azimuths.iter().map(|&psi| at(psi)));

        assert_relative_eq!(fitted.mean, exact.mean, epsilon = 1e-14);
        assert_relative_eq!(fitted.cosine, exact.cosine, epsilon = 1e-14);
        assert_relative_eq!(fitted.sine, exact.sine, epsilon = 1e-14);
        assert!(exact.change(&fitted) < 1e-14);
    }

    #[test]
    fn change_is_the_largest_coefficient_difference() {
        let a = SweepState {
            mean: 0.3,
            cosine: 0.0,
            sine: 0.0,
        };
        let b = SweepState {
            mean: 0.31,
            cosine: -0.05,
            sine: 0.02,
        };
        assert_relative_eq!(a.change(&b), 0.05);
    }

    #[test]
    fn local_solves_see_only_the_mean() {
        let rotor = rotor();
        let condition = condition(8.0, 3.0).with_yaw(Angle::new::<degree>(10.0));
        let chain = CorrectionChain::from_ids(&["prandtl", "burton"]).unwrap();
        let config = SolverConfig::coupled();
        let sweep = Sweep::new(&rotor, &rotor.sections()[1], &condition, &chain, &config);

        let mean_only = SweepState {
            mean: 0.3,
            ..SweepState::default()
        };
        let with_harmonics = SweepState {
            cosine: 0.1,
            sine: -0.1,
            ..mean_only
        };

        let a = sweep.solve_at(&mean_only, 1.0).unwrap();
        let b = sweep.solve_at(&with_harmonics, 1.0).unwrap();
        assert_eq!(a.induction, b.induction);
    }
}
