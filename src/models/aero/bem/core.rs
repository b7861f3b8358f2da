//! Blade element momentum solver for a rigid rotor.
//!
//! A [`BemSolver`] combines a [`Rotor`], a [`CorrectionChain`] and a
//! [`SolverConfig`]. Every evaluation finds the axial and tangential
//! induction factors of each blade section, then converts them into forces
//! per unit span from the section's airfoil polar.
//!
//! Sections are independent of each other, so they are solved on the rayon
//! thread pool unless [`SolverConfig::parallel`] is cleared. Results do not
//! depend on that setting.

mod condition;
mod config;
mod error;
mod momentum;
mod ning;
mod results;
mod section;

#[cfg(test)]
mod test_support;

pub use condition::OperatingCondition;
pub use config::{CoupledConfig, ModelVariant, SolverConfig};
pub use error::{ConfigError, ConvergenceError, SolveError, StepError};
pub use momentum::Breakdown;
pub use results::{Cycle, Loads, Regime, SectionLoads};

use std::{f64::consts::TAU, sync::Arc};

use log::debug;
use rayon::prelude::*;
use uom::si::{
    angle::radian,
    f64::{Angle, Time},
    time::second,
};

use crate::support::{
    aero::{CorrectionChain, Rotor, Section},
    constraint::{Constrained, StrictlyPositive},
};

use error::SectionError;
use ning::{coupled::Sweep, uncoupled};
use section::{Local, Solution};

/// Entry point for blade element momentum evaluations of one rotor.
///
/// The solver holds no mutable state; every method is a pure function of
/// the solver and its arguments, apart from logging.
#[derive(Debug, Clone)]
pub struct BemSolver {
    rotor: Arc<Rotor>,
    corrections: CorrectionChain,
    config: SolverConfig,
}

impl BemSolver {
    /// Creates a solver.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Solver`] if a setting of `config` is out of range.
    pub fn new(
        rotor: Arc<Rotor>,
        corrections: CorrectionChain,
        config: SolverConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rotor,
            corrections,
            config,
        })
    }

    /// Creates a solver with a correction chain given by identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Correction`] if the identifiers do not form a
    /// valid chain, or [`ConfigError::Solver`] as for [`new`](Self::new).
    pub fn from_ids<S: AsRef<str>>(
        rotor: Arc<Rotor>,
        corrections: &[S],
        config: SolverConfig,
    ) -> Result<Self, ConfigError> {
        let corrections = CorrectionChain::from_ids(corrections)?;
        Self::new(rotor, corrections, config)
    }

    #[must_use]
    pub fn rotor(&self) -> &Rotor {
        &self.rotor
    }

    #[must_use]
    pub fn corrections(&self) -> &CorrectionChain {
        &self.corrections
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Loads of every section at the condition's azimuth.
    ///
    /// With the coupled model, the azimuth sweep of each section is first
    /// converged on [`CoupledConfig::sweep_azimuths`] points.
    ///
    /// # Errors
    ///
    /// Returns the [`SolveError`] of the first failing section, in rotor order.
    pub fn steady(&self, condition: &OperatingCondition) -> Result<Loads, SolveError> {
        let indices: Vec<usize> = (0..self.rotor.sections().len()).collect();
        self.steady_sections(condition, &indices)
    }

    /// Loads of the sections at `indices`, in the given order.
    ///
    /// Each section is solved exactly as in [`steady`](Self::steady), so the
    /// entries match the corresponding entries of a full evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::NoSuchSection`] for the first index past the end
    /// of the rotor, before anything is solved. Otherwise returns the
    /// [`SolveError`] of the first failing section, in the order of `indices`.
    pub fn steady_sections(
        &self,
        condition: &OperatingCondition,
        indices: &[usize],
    ) -> Result<Loads, SolveError> {
        let sections = self.rotor.sections();
        if let Some(&section) = indices.iter().find(|&&index| index >= sections.len()) {
            return Err(SolveError::NoSuchSection {
                section,
                count: sections.len(),
            });
        }

        let azimuth = condition.azimuth.get::<radian>();
        let loads = map_collect(self.config.parallel, indices, |&index| {
            let local = Local::new(&self.rotor, &sections[index], condition);
            self.solve_section(&local, condition)
                .and_then(|solution| local.loads(&solution))
                .map_err(|err| err.at(index, azimuth))
        })
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "solved {} sections at azimuth {azimuth:.4} rad",
            loads.len()
        );

        Ok(Loads {
            azimuth: condition.azimuth,
            sections: loads,
        })
    }

    /// Loads over one revolution on `azimuths` uniformly spaced points,
    /// starting at zero.
    ///
    /// The condition's own azimuth is ignored. With the coupled model and at
    /// least three points, each section's sweep runs on this grid; with fewer
    /// points every azimuth is a [`steady`](Self::steady) evaluation.
    ///
    /// A failure at one azimuth does not stop the others.
    #[must_use]
    pub fn cycle(
        &self,
        condition: &OperatingCondition,
        azimuths: Constrained<usize, StrictlyPositive>,
    ) -> Cycle {
        let grid = uniform_grid(azimuths.get());

        let loads = match self.config.model {
            ModelVariant::Coupled if grid.len() >= 3 => self.coupled_cycle(condition, &grid),
            _ => map_collect(self.config.parallel, &grid, |&psi| {
                self.steady(&condition.at_azimuth(psi))
            }),
        };

        Cycle {
            azimuths: grid.iter().map(|&psi| Angle::new::<radian>(psi)).collect(),
            loads,
        }
    }

    /// Loads over one revolution at azimuths `k · step`, starting at zero and
    /// stopping before `2π`.
    ///
    /// For a time step `dt`, pass `Ω · dt` as the step. When `step` divides
    /// the revolution into a whole number of points this is
    /// [`cycle`](Self::cycle) on that many points; otherwise every azimuth is
    /// a [`steady`](Self::steady) evaluation.
    #[must_use]
    pub fn cycle_with_step(
        &self,
        condition: &OperatingCondition,
        step: Constrained<Angle, StrictlyPositive>,
    ) -> Cycle {
        let step = step.get().get::<radian>();
        let turns = TAU / step;

        if (turns - turns.round()).abs() <= GRID_TOL * turns {
            if let Ok(points) = StrictlyPositive::new(turns.round() as usize) {
                return self.cycle(condition, points);
            }
        }

        let grid: Vec<f64> = (0..turns.ceil() as usize).map(|k| k as f64 * step).collect();
        let loads = map_collect(self.config.parallel, &grid, |&psi| {
            self.steady(&condition.at_azimuth(psi))
        });

        Cycle {
            azimuths: grid.iter().map(|&psi| Angle::new::<radian>(psi)).collect(),
            loads,
        }
    }

    /// Evaluates a sequence of conditions spaced by a fixed time step.
    ///
    /// Each step is a steady evaluation. When the chain contains the
    /// `knudsen` correction, the axial induction of each section is filtered
    /// across the steps of this call, starting from the model's initial
    /// value. A failed section keeps its filter state for the next step.
    pub fn time_march(
        &self,
        conditions: &[OperatingCondition],
        time_step: Constrained<Time, StrictlyPositive>,
    ) -> Vec<Result<Loads, StepError>> {
        let dt = time_step.get().get::<second>();
        let knudsen = self.corrections.dynamic_inflow();
        let mut filtered = vec![
            knudsen.map_or(0.0, |model| model.initial);
            self.rotor.sections().len()
        ];

        conditions
            .iter()
            .enumerate()
            .map(|(step, condition)| -> Result<Loads, StepError> {
                let azimuth = condition.azimuth.get::<radian>();

                let sections: Vec<Result<SectionLoads, SolveError>> = self
                    .solve_sections(condition)
                    .into_iter()
                    .zip(filtered.iter_mut())
                    .enumerate()
                    .map(|(index, (solved, filtered))| -> Result<SectionLoads, SolveError> {
                        let (local, mut solution) = solved?;
                        if let Some(model) = knudsen {
                            *filtered = model.step(
                                *filtered,
                                solution.induction.axial,
                                solution.axial_velocity(),
                                local.radius(),
                                dt,
                            );
                            solution.induction.axial = *filtered;
                        }
                        local
                            .loads(&solution)
                            .map_err(|err| err.at(index, azimuth))
                    })
                    .collect();

                let sections = sections
                    .into_iter()
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| StepError { step, source })?;

                Ok(Loads {
                    azimuth: condition.azimuth,
                    sections,
                })
            })
            .collect()
    }

    /// Induction solutions of every section, in rotor order.
    fn solve_sections(
        &self,
        condition: &OperatingCondition,
    ) -> Vec<Result<(Local<'_>, Solution), SolveError>> {
        let azimuth = condition.azimuth.get::<radian>();

        self.map_sections(|index, section| {
            let local = Local::new(&self.rotor, section, condition);
            self.solve_section(&local, condition)
                .map(|solution| (local, solution))
                .map_err(|err| err.at(index, azimuth))
        })
    }

    fn solve_section(
        &self,
        local: &Local<'_>,
        condition: &OperatingCondition,
    ) -> Result<Solution, SectionError> {
        match self.config.model {
            ModelVariant::Uncoupled => {
                let inflow = condition.inflow(&self.rotor, local.radius());
                uncoupled::solve(local, inflow, &self.corrections, &self.config)
            }
            ModelVariant::Coupled => {
                let sweep = self.sweep(local.section, condition);
                let grid = uniform_grid(self.config.coupled.sweep_azimuths);
                let (state, _) = sweep.converge(&grid)?;
                sweep.solve_at(&state, condition.azimuth.get::<radian>())
            }
        }
    }

    /// Coupled cycle: one sweep per section on `grid`, then loads per azimuth.
    fn coupled_cycle(
        &self,
        condition: &OperatingCondition,
        grid: &[f64],
    ) -> Vec<Result<Loads, SolveError>> {
        let sweeps = self.map_sections(|_, section| {
            self.sweep(section, condition)
                .converge(grid)
                .map(|(_, solutions)| solutions)
        });

        grid.iter()
            .enumerate()
            .map(|(k, &psi)| -> Result<Loads, SolveError> {
                let at = condition.at_azimuth(psi);
                let sections = self
                    .rotor
                    .sections()
                    .iter()
                    .zip(&sweeps)
                    .enumerate()
                    .map(|(index, (section, sweep))| -> Result<SectionLoads, SolveError> {
                        let solutions = sweep
                            .as_ref()
                            .map_err(|err| err.clone().at(index, psi))?;
                        Local::new(&self.rotor, section, &at)
                            .loads(&solutions[k])
                            .map_err(|err| err.at(index, psi))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Loads {
                    azimuth: at.azimuth,
                    sections,
                })
            })
            .collect()
    }

    fn sweep<'s>(&'s self, section: &'s Section, condition: &'s OperatingCondition) -> Sweep<'s> {
        Sweep::new(
            &self.rotor,
            section,
            condition,
            &self.corrections,
            &self.config,
        )
    }

    /// Applies `f` to every section with its index, in rotor order.
    fn map_sections<'s, R, F>(&'s self, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize, &'s Section) -> R + Sync + Send,
    {
        let sections = self.rotor.sections();
        if self.config.parallel {
            sections
                .par_iter()
                .enumerate()
                .map(|(index, section)| f(index, section))
                .collect()
        } else {
            sections
                .iter()
                .enumerate()
                .map(|(index, section)| f(index, section))
                .collect()
        }
    }
}

/// Maps `f` over `items`, on the rayon thread pool when `parallel` is set.
///
/// The output keeps the input order either way.
pub(crate) fn map_collect<T, R, F>(parallel: bool, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Relative tolerance for treating `2π / step` as a whole number.
const GRID_TOL: f64 = 1e-9;

/// Azimuths `2πk/n` for `k < n`, radians.
fn uniform_grid(n: usize) -> Vec<f64> {
    (0..n).map(|k| TAU * k as f64 / n as f64).collect()
}
