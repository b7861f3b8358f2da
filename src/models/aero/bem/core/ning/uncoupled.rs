//! Uncoupled induction solver.
//!
//! Each section is solved on its own with the single unknown being the
//! inflow angle `φ`, following Ning (2014). The residual is bracketed on
//! fixed candidate intervals so the root find is guaranteed to terminate.

mod problem;

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use log::{debug, warn};
use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;

use crate::{
    models::aero::bem::core::{
        ConvergenceError, Regime, SolverConfig,
        condition::Inflow,
        error::SectionError,
        section::{Frame, Local, Solution},
    },
    support::aero::{CorrectionChain, Induction},
};

use problem::{InflowModel, InflowProblem};

/// Solves the induction factors of one section at one azimuth.
///
/// The correction chain contributes the loss factor during the solve, and
/// the wake skew angle and induction adjustments afterwards.
///
/// # Errors
///
/// Returns a [`SectionError`] if the velocity triangle is degenerate, a polar
/// lookup at a bracket end is out of range, or no bracket or converged root
/// is found.
pub(crate) fn solve(
    local: &Local<'_>,
    inflow: Inflow,
    chain: &CorrectionChain,
    config: &SolverConfig,
) -> Result<Solution, SectionError> {
    let ratio = inflow.ratio().ok_or(ConvergenceError::DegenerateInflow)?;

    let epsilon = config.bracket_epsilon;
    let model = InflowModel::new(local, inflow, chain, config.breakdown, epsilon);
    let problem = InflowProblem::new(ratio);

    let residual = |phi: f64| -> Result<f64, SectionError> {
        let state = model.call(&phi)?;
        let [r] = problem
            .residuals(&phi, &state)
            .unwrap_or_else(|never| match never {});
        Ok(r)
    };

    // Momentum region first, then the propeller brake, then the region
    // beyond π/2 reached with strong reverse swirl.
    let candidates = [
        [epsilon, FRAC_PI_2],
        [-FRAC_PI_4, -epsilon],
        [FRAC_PI_2, PI - epsilon],
    ];

    let mut bracket = None;
    for [lo, hi] in candidates {
        if residual(lo)? * residual(hi)? < 0.0 {
            bracket = Some([lo, hi]);
            break;
        }
    }
    let bracket = bracket.ok_or(ConvergenceError::NoBracket)?;

    let solution = bisection::solve(
        &model,
        &problem,
        bracket,
        &config.bisection(),
        |_event: &bisection::Event<'_, _, _>| None,
    )
    .map_err(ConvergenceError::from)?;

    if solution.status != bisection::Status::Converged {
        return Err(ConvergenceError::MaxIters {
            residual: solution.residual,
            iters: solution.iters,
        }
        .into());
    }

    let state = solution.snapshot.output;
    debug!(
        "section r={:.3} m: a={:.5} a'={:.5} {:?} after {} iterations",
        local.radius(),
        state.axial,
        state.tangential,
        state.regime,
        solution.iters
    );
    if state.regime == Regime::PropellerBrake {
        warn!(
            "propeller brake state at r={:.3} m (a={:.3})",
            local.radius(),
            state.axial
        );
    }

    let wake_skew = chain.wake_skew(state.axial, local.station.yaw);
    let induction = chain.apply(
        &local.station_with_skew(wake_skew),
        Induction {
            axial: state.axial,
            tangential: state.tangential,
        },
    );

    Ok(Solution {
        induction,
        loss: state.loss,
        regime: state.regime,
        frame: Frame::Uncoupled { inflow },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::aero::bem::core::test_support::{condition, rotor};

    fn solve_section(index: usize, chain: &CorrectionChain) -> Result<Solution, SectionError> {
        let rotor = rotor();
        let condition = condition(8.0, 3.0);
        let local = Local::new(&rotor, &rotor.sections()[index], &condition);
        let inflow = condition.inflow(&rotor, local.radius());
        solve(&local, inflow, chain, &SolverConfig::default())
    }

    #[test]
    fn momentum_and_blade_element_agree() {
        let rotor = rotor();
        let condition = condition(8.0, 3.0);
        let chain = CorrectionChain::from_ids(&["prandtl"]).unwrap();

        for section in rotor.sections() {
            let local = Local::new(&rotor, section, &condition);
            let inflow = condition.inflow(&rotor, local.radius());
            let solution = solve(&local, inflow, &chain, &SolverConfig::default()).unwrap();
            assert_eq!(solution.regime, Regime::Momentum);

            // Recompute κ at the converged inflow angle and check `a = κ / (1 + κ)`.
            let Induction {
                axial: a,
                tangential: a_prime,
            } = solution.induction;
            let phi = (inflow.axial * (1.0 - a)).atan2(inflow.tangential * (1.0 + a_prime));
            let model = InflowModel::new(&local, inflow, &chain, Default::default(), 1e-5);
            let state = model.call(&phi).unwrap();

            assert_relative_eq!(state.axial, a, epsilon = 1e-9);
            assert_relative_eq!(state.tangential, a_prime, epsilon = 1e-9);
            assert_relative_eq!(state.kappa * (1.0 - a) / a, 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn converged_residual_is_small() {
        let solution = solve_section(2, &CorrectionChain::empty()).unwrap();
        assert!(solution.induction.axial > 0.0 && solution.induction.axial < 0.5);
        assert_eq!(solution.loss, 1.0);
    }

    #[test]
    fn stopped_rotor_is_degenerate() {
        let rotor = rotor();
        let condition = condition(8.0, 0.0);
        let local = Local::new(&rotor, &rotor.sections()[0], &condition);
        let inflow = condition.inflow(&rotor, local.radius());

        let err = solve(&local, inflow, &CorrectionChain::empty(), &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SectionError::Convergence(ConvergenceError::DegenerateInflow)
        ));
    }
}
