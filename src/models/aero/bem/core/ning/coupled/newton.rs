//! Bounded damped Newton iteration for two unknowns.

use log::trace;

use crate::models::aero::bem::core::{ConvergenceError, error::SectionError};

/// Step halvings tried before a non-decreasing step is accepted anyway.
const MAX_HALVINGS: u32 = 10;

/// Settings of one bounded Newton solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Newton {
    pub residual_tol: f64,
    pub max_iters: usize,
    pub fd_step: f64,

    /// Lower corner of the search box.
    pub lower: [f64; 2],

    /// Upper corner of the search box.
    pub upper: [f64; 2],
}

impl Newton {
    /// Iterates from `start` until the largest residual magnitude is below
    /// the tolerance.
    ///
    /// The Jacobian is a forward-difference approximation. Each step is
    /// halved until it decreases the residual, and every iterate is
    /// projected onto the search box.
    ///
    /// # Errors
    ///
    /// Propagates residual failures, and returns
    /// [`ConvergenceError::SingularJacobian`] or [`ConvergenceError::MaxIters`].
    pub(super) fn solve<F>(&self, start: [f64; 2], mut residuals: F) -> Result<[f64; 2], SectionError>
    where
        F: FnMut([f64; 2]) -> Result<[f64; 2], SectionError>,
    {
        let mut x = self.project(start);
        let mut r = residuals(x)?;

        for iter in 0..self.max_iters {
            let norm = max_abs(r);
            if norm <= self.residual_tol {
                return Ok(x);
            }

            let mut jacobian = [[0.0; 2]; 2];
            for k in 0..2 {
                let h = self.fd_step * x[k].abs().max(1.0);
                let mut shifted = x;
                shifted[k] += h;
                let rk = residuals(shifted)?;
                jacobian[0][k] = (rk[0] - r[0]) / h;
                jacobian[1][k] = (rk[1] - r[1]) / h;
            }

            let [[j00, j01], [j10, j11]] = jacobian;
            let det = j00 * j11 - j01 * j10;
            if !det.is_finite() || det == 0.0 {
                return Err(ConvergenceError::SingularJacobian { iters: iter }.into());
            }
            let dx = [
                -(j11 * r[0] - j01 * r[1]) / det,
                -(j00 * r[1] - j10 * r[0]) / det,
            ];

            let mut lambda = 1.0;
            for halving in 0..=MAX_HALVINGS {
                let trial = self.project([x[0] + lambda * dx[0], x[1] + lambda * dx[1]]);
                let rt = residuals(trial)?;
                if max_abs(rt) < norm || halving == MAX_HALVINGS {
                    x = trial;
                    r = rt;
                    break;
                }
                lambda *= 0.5;
            }

            trace!(
                "newton iter {iter}: x=({:.6e}, {:.6e}) step={lambda} residual={:.3e}",
                x[0],
                x[1],
                max_abs(r)
            );
        }

        let residual = max_abs(r);
        if residual <= self.residual_tol {
            Ok(x)
        } else {
            Err(ConvergenceError::MaxIters {
                residual,
                iters: self.max_iters,
            }
            .into())
        }
    }

    fn project(&self, x: [f64; 2]) -> [f64; 2] {
        [
            x[0].clamp(self.lower[0], self.upper[0]),
            x[1].clamp(self.lower[1], self.upper[1]),
        ]
    }
}

/// Largest component magnitude, infinite if any component is not a number.
fn max_abs(r: [f64; 2]) -> f64 {
    if r.iter().any(|v| v.is_nan()) {
        return f64::INFINITY;
    }
    r[0].abs().max(r[1].abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn newton(lower: [f64; 2], upper: [f64; 2]) -> Newton {
        Newton {
            residual_tol: 1e-12,
            max_iters: 50,
            fd_step: 1e-7,
            lower,
            upper,
        }
    }

    #[test]
    fn solves_a_nonlinear_system() {
        // x² + y² = 1, y = x³
        let solver = newton([0.0, 0.0], [1.0, 1.0]);
        let [x, y] = solver
            .solve([0.8, 0.6], |[x, y]| Ok([x * x + y * y - 1.0, y - x * x * x]))
            .unwrap();

        assert_relative_eq!(x * x + y * y, 1.0, epsilon = 1e-10);
        assert_relative_eq!(y, x * x * x, epsilon = 1e-10);
    }

    #[test]
    fn stays_inside_the_box() {
        // The root (2, 2) lies outside the box.
        let solver = newton([-1.0, -1.0], [1.0, 1.0]);
        let err = solver
            .solve([0.0, 0.0], |[x, y]| Ok([x - 2.0, y - 2.0]))
            .unwrap_err();

        assert!(matches!(
            err,
            SectionError::Convergence(ConvergenceError::MaxIters { .. })
        ));
    }

    #[test]
    fn reports_singular_jacobian() {
        let solver = newton([-1.0, -1.0], [1.0, 1.0]);
        let err = solver
            .solve([0.5, 0.5], |[x, _y]| Ok([x - 0.1, 1.0]))
            .unwrap_err();

        assert!(matches!(
            err,
            SectionError::Convergence(ConvergenceError::SingularJacobian { iters: 0 })
        ));
    }
}
