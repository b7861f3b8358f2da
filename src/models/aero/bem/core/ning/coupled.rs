//! Coupled induction solver for skewed inflow.
//!
//! At each azimuth the unknowns are the axial and tangential induction
//! factors, found where the blade element thrust and torque coefficients
//! match their momentum counterparts. The wake skew angle that enters both
//! sides depends on the mean induction of the whole annulus, which couples
//! the azimuths of a revolution; [`sweep`] iterates on that coupling.

mod newton;
mod sweep;

pub(crate) use sweep::Sweep;

use log::warn;

use crate::{
    models::aero::bem::core::{
        ConvergenceError, Regime, SolverConfig,
        condition::Inflow,
        error::SectionError,
        momentum,
        section::{Frame, Local, Solution},
    },
    support::aero::{Coefficients, CorrectionChain, Induction},
};

use newton::Newton;

/// Thrust and torque residuals of one section at one azimuth.
pub(crate) struct LocalProblem<'a> {
    local: &'a Local<'a>,
    chain: &'a CorrectionChain,
    config: &'a SolverConfig,
    hub: Inflow,
    wake_skew: f64,
}

/// Momentum-side quantities at an evaluated induction state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Evaluation {
    residuals: [f64; 2],
    loss: f64,
    regime: Regime,
}

impl<'a> LocalProblem<'a> {
    /// Builds the local problem for a fixed wake skew angle (radians).
    ///
    /// # Errors
    ///
    /// Returns [`ConvergenceError::DegenerateInflow`] if either hub velocity
    /// component is zero or not finite.
    pub(crate) fn new(
        local: &'a Local<'a>,
        hub: Inflow,
        wake_skew: f64,
        chain: &'a CorrectionChain,
        config: &'a SolverConfig,
    ) -> Result<Self, SectionError> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        if !(usable(hub.axial) && usable(hub.tangential)) {
            return Err(ConvergenceError::DegenerateInflow.into());
        }

        Ok(Self {
            local,
            chain,
            config,
            hub,
            wake_skew,
        })
    }

    fn frame(&self) -> Frame {
        Frame::Coupled {
            hub: self.hub,
            wake_skew: self.wake_skew,
            yaw: self.local.station.yaw,
            azimuth: self.local.station.azimuth,
        }
    }

    fn evaluate(&self, induction: Induction) -> Result<Evaluation, SectionError> {
        let Self { hub, wake_skew, .. } = *self;
        let yaw = self.local.station.yaw;
        let azimuth = self.local.station.azimuth;
        let Induction {
            axial: a,
            tangential: a_prime,
        } = induction;

        let relative = self.frame().relative(induction);
        let phi = relative.axial.atan2(relative.tangential);
        let Coefficients { cl, cd } = self.local.coefficients(phi - self.local.theta)?;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let cx = cl * cos_phi + cd * sin_phi;
        let cy = cl * sin_phi - cd * cos_phi;

        let loss = self
            .chain
            .loss_factor(&self.local.station_with_skew(wake_skew), phi);

        let scale = (relative.axial.powi(2) + relative.tangential.powi(2)) / hub.axial.powi(2)
            * self.local.solidity;
        let ct_element = scale * cx;
        let cq_element = scale * (cy * wake_skew.cos() - cx * wake_skew.sin() * azimuth.cos());

        let (ct_momentum, regime) = momentum::thrust(
            a,
            loss,
            yaw,
            self.config.breakdown,
            self.chain.high_induction(),
        );
        let cq_momentum = momentum::torque(a, a_prime, hub, loss, wake_skew, azimuth, yaw);

        Ok(Evaluation {
            residuals: [ct_element - ct_momentum, cq_element - cq_momentum],
            loss,
            regime,
        })
    }

    /// Solves for `(a, a')` starting at `start`, inside a box centered on
    /// `center`.
    ///
    /// Returns the local root together with the solution after the chain's
    /// induction adjustments.
    ///
    /// # Errors
    ///
    /// Returns a [`SectionError`] on polar lookup failures or when the Newton
    /// iteration does not converge.
    pub(crate) fn solve(
        &self,
        start: Induction,
        center: Induction,
    ) -> Result<(Induction, Solution), SectionError> {
        let coupled = &self.config.coupled;
        let radius = coupled.search_radius;
        let newton = Newton {
            residual_tol: coupled.residual_tol,
            max_iters: coupled.max_iters,
            fd_step: coupled.fd_step,
            lower: [center.axial - radius, center.tangential - radius],
            upper: [center.axial + radius, center.tangential + radius],
        };

        let [axial, tangential] = newton.solve([start.axial, start.tangential], |[a, a_prime]| {
            self.evaluate(Induction {
                axial: a,
                tangential: a_prime,
            })
            .map(|evaluation| evaluation.residuals)
        })?;

        let raw = Induction { axial, tangential };
        let evaluation = self.evaluate(raw)?;
        if evaluation.regime == Regime::PropellerBrake {
            warn!(
                "propeller brake state at r={:.3} m, azimuth {:.3} rad (a={axial:.3})",
                self.local.radius(),
                self.local.station.azimuth
            );
        }

        let solution = Solution {
            induction: self
                .chain
                .apply(&self.local.station_with_skew(self.wake_skew), raw),
            loss: evaluation.loss,
            regime: evaluation.regime,
            frame: self.frame(),
        };
        Ok((raw, solution))
    }
}
