//! Problem formulation for the inflow angle solve.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};

use crate::{
    models::aero::bem::core::{
        Regime, condition::Inflow, momentum::Breakdown, section::Local,
    },
    support::aero::{Coefficients, CorrectionChain, OutOfRangeError},
};

/// Largest axial and tangential induction magnitude the solver reports.
const MAX_INDUCTION: f64 = 2.0;

/// Induction state implied by an inflow angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct InflowState {
    pub axial: f64,
    pub tangential: f64,

    /// `κ = σ' Cx / (4 F sin²φ)`.
    pub kappa: f64,

    pub loss: f64,
    pub regime: Regime,
}

/// Maps an inflow angle (radians) to the induction factors that blade
/// element theory and momentum theory would agree on at that angle.
///
/// Above the critical loading, the chain's `buhl` correction takes
/// precedence over the configured [`Breakdown`].
pub(super) struct InflowModel<'a> {
    local: &'a Local<'a>,
    inflow: Inflow,
    chain: &'a CorrectionChain,
    breakdown: Breakdown,
    epsilon: f64,
}

impl<'a> InflowModel<'a> {
    pub(super) fn new(
        local: &'a Local<'a>,
        inflow: Inflow,
        chain: &'a CorrectionChain,
        breakdown: Breakdown,
        epsilon: f64,
    ) -> Self {
        Self {
            local,
            inflow,
            chain,
            breakdown,
            epsilon,
        }
    }
}

impl Model for InflowModel<'_> {
    type Input = f64;
    type Output = InflowState;
    type Error = OutOfRangeError;

    fn call(&self, phi: &Self::Input) -> Result<Self::Output, Self::Error> {
        let phi = *phi;
        let Coefficients { cl, cd } = self.local.coefficients(phi - self.local.theta)?;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let cx = cl * cos_phi + cd * sin_phi;
        let cy = cl * sin_phi - cd * cos_phi;

        let loss = self.chain.loss_factor(&self.local.station, phi);
        let sigma = self.local.solidity;
        let kappa = sigma * cx / (4.0 * loss * sin_phi * sin_phi);
        let mut kappa_prime = sigma * cy / (4.0 * loss * sin_phi * cos_phi);

        let ux = self.inflow.axial;
        let momentum_region = (phi >= 0.0 && ux >= 0.0) || (phi < 0.0 && ux < 0.0);

        let (mut axial, regime, valid) = if momentum_region {
            let high_induction = self.chain.high_induction();
            let critical_kappa = high_induction
                .map_or(self.breakdown.critical_kappa(), |model| {
                    model.beta / (1.0 - model.beta)
                });

            if kappa <= critical_kappa {
                (kappa / (1.0 + kappa), Regime::Momentum, kappa >= -1.0)
            } else {
                let axial = match high_induction {
                    Some(model) => model.axial_induction(kappa, loss),
                    None => self.breakdown.axial_induction(kappa, loss, self.epsilon),
                };
                (axial, Regime::HighInduction, true)
            }
        } else {
            (
                (kappa / (kappa - 1.0)).min(MAX_INDUCTION),
                Regime::PropellerBrake,
                kappa > 1.0,
            )
        };

        if ux <= 0.0 {
            kappa_prime = -kappa_prime;
        }
        let mut tangential =
            (kappa_prime / (1.0 - kappa_prime)).clamp(-MAX_INDUCTION, MAX_INDUCTION);

        if !valid {
            axial = 0.0;
            tangential = 0.0;
        }

        Ok(InflowState {
            axial,
            tangential,
            kappa,
            loss,
            regime,
        })
    }
}

/// Residual of the inflow angle equation.
///
/// `sin φ / (1 - a) - (U_x / U_y) cos φ / (1 + a')` in the momentum region,
/// with `κ` in place of `a` in the propeller brake region.
pub(super) struct InflowProblem {
    ratio: f64,
}

impl InflowProblem {
    pub(super) fn new(ratio: f64) -> Self {
        Self { ratio }
    }
}

impl EquationProblem<1> for InflowProblem {
    type Input = f64;
    type Output = InflowState;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(&self, phi: &Self::Input, state: &Self::Output) -> Result<[f64; 1], Self::Error> {
        let momentum = match state.regime {
            Regime::PropellerBrake => state.kappa,
            Regime::Momentum | Regime::HighInduction => state.axial,
        };
        Ok([phi.sin() / (1.0 - momentum)
            - self.ratio * phi.cos() / (1.0 + state.tangential)])
    }
}
