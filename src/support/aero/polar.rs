//! Airfoil polar tables.
//!
//! A polar maps angle of attack to lift and drag coefficients. Lookups use
//! linear interpolation between the two samples that bracket the requested
//! angle. Angles outside the table fail unless an [`Extrapolation`] policy is
//! chosen explicitly.

use thiserror::Error;
use uom::si::{angle::radian, f64::Angle};

/// One tabulated point of a polar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarSample {
    /// Angle of attack in radians.
    pub alpha: f64,

    /// Lift coefficient.
    pub cl: f64,

    /// Drag coefficient.
    pub cd: f64,
}

/// Lift and drag coefficients returned by a polar lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub cl: f64,
    pub cd: f64,
}

/// Behavior of a lookup outside the tabulated angle-of-attack range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Extrapolation {
    /// Out-of-range lookups fail with [`OutOfRangeError`].
    #[default]
    None,

    /// Out-of-range lookups return the coefficients of the nearest end sample.
    Clamp,
}

/// An angle of attack fell outside the tabulated range of a polar.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("angle of attack {alpha:.6} rad outside polar range [{min:.6}, {max:.6}] rad")]
pub struct OutOfRangeError {
    /// Requested angle of attack, radians.
    pub alpha: f64,

    /// Smallest tabulated angle of attack, radians.
    pub min: f64,

    /// Largest tabulated angle of attack, radians.
    pub max: f64,
}

/// Errors that can occur while building a [`PolarTable`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PolarTableError {
    /// Fewer than two samples were provided.
    #[error("polar needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    /// A sample contains a non-finite value.
    #[error("polar sample {index} is not finite")]
    NotFinite { index: usize },

    /// Angles of attack are not strictly increasing.
    #[error("polar angles must be strictly increasing (sample {index})")]
    NotIncreasing { index: usize },
}

/// Tabulated airfoil polar.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarTable {
    samples: Vec<PolarSample>,
    extrapolation: Extrapolation,
}

impl PolarTable {
    /// Builds a polar from samples ordered by increasing angle of attack.
    ///
    /// # Errors
    ///
    /// Returns [`PolarTableError`] if fewer than two samples are given, any
    /// value is not finite, or the angles are not strictly increasing.
    pub fn new(samples: Vec<PolarSample>) -> Result<Self, PolarTableError> {
        if samples.len() < 2 {
            return Err(PolarTableError::TooFewSamples(samples.len()));
        }

        for (index, s) in samples.iter().enumerate() {
            if !(s.alpha.is_finite() && s.cl.is_finite() && s.cd.is_finite()) {
                return Err(PolarTableError::NotFinite { index });
            }
            if index > 0 && s.alpha <= samples[index - 1].alpha {
                return Err(PolarTableError::NotIncreasing { index });
            }
        }

        Ok(Self {
            samples,
            extrapolation: Extrapolation::None,
        })
    }

    /// Builds a polar from `(alpha_deg, cl, cd)` rows, the layout of most
    /// tabulated airfoil data.
    ///
    /// # Errors
    ///
    /// See [`PolarTable::new`].
    pub fn from_degrees(rows: &[(f64, f64, f64)]) -> Result<Self, PolarTableError> {
        Self::new(
            rows.iter()
                .map(|&(alpha_deg, cl, cd)| PolarSample {
                    alpha: alpha_deg.to_radians(),
                    cl,
                    cd,
                })
                .collect(),
        )
    }

    /// Returns this polar with the given extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Tabulated samples.
    #[must_use]
    pub fn samples(&self) -> &[PolarSample] {
        &self.samples
    }

    /// Tabulated angle-of-attack range in radians.
    #[must_use]
    pub fn alpha_range(&self) -> (f64, f64) {
        let first = self.samples[0].alpha;
        let last = self.samples[self.samples.len() - 1].alpha;
        (first, last)
    }

    /// Looks up lift and drag coefficients at an angle of attack.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `alpha` is outside the table and the
    /// extrapolation policy is [`Extrapolation::None`].
    pub fn lookup(&self, alpha: Angle) -> Result<Coefficients, OutOfRangeError> {
        self.coefficients(alpha.get::<radian>())
    }

    /// Same as [`PolarTable::lookup`] with the angle in radians.
    ///
    /// # Errors
    ///
    /// See [`PolarTable::lookup`].
    pub fn coefficients(&self, alpha: f64) -> Result<Coefficients, OutOfRangeError> {
        let (min, max) = self.alpha_range();
        let first = &self.samples[0];
        let last = &self.samples[self.samples.len() - 1];

        // NaN fails every comparison below and lands here.
        if !(alpha >= min && alpha <= max) {
            return match self.extrapolation {
                Extrapolation::Clamp if alpha < min => Ok(first.into()),
                Extrapolation::Clamp if alpha > max => Ok(last.into()),
                _ => Err(OutOfRangeError { alpha, min, max }),
            };
        }

        // Index of the first sample with angle > alpha, in 1..=len.
        let upper = self
            .samples
            .partition_point(|s| s.alpha <= alpha)
            .min(self.samples.len() - 1);
        let hi = &self.samples[upper];
        let lo = &self.samples[upper - 1];

        let t = (alpha - lo.alpha) / (hi.alpha - lo.alpha);
        Ok(Coefficients {
            cl: lo.cl + t * (hi.cl - lo.cl),
            cd: lo.cd + t * (hi.cd - lo.cd),
        })
    }
}

impl From<&PolarSample> for Coefficients {
    fn from(sample: &PolarSample) -> Self {
        Self {
            cl: sample.cl,
            cd: sample.cd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::angle::degree;

    fn table() -> PolarTable {
        PolarTable::from_degrees(&[
            (-10.0, -0.8, 0.02),
            (0.0, 0.2, 0.01),
            (10.0, 1.2, 0.03),
            (20.0, 1.0, 0.20),
        ])
        .unwrap()
    }

    #[test]
    fn interpolates_between_samples() {
        let c = table().lookup(Angle::new::<degree>(5.0)).unwrap();
        assert_relative_eq!(c.cl, 0.7, epsilon = 1e-12);
        assert_relative_eq!(c.cd, 0.02, epsilon = 1e-12);

        let c = table().lookup(Angle::new::<degree>(15.0)).unwrap();
        assert_relative_eq!(c.cl, 1.1, epsilon = 1e-12);
        assert_relative_eq!(c.cd, 0.115, epsilon = 1e-12);
    }

    #[test]
    fn hits_samples_and_end_points_exactly() {
        let polar = table();
        for sample in polar.samples() {
            let c = polar.coefficients(sample.alpha).unwrap();
            assert_relative_eq!(c.cl, sample.cl, epsilon = 1e-12);
            assert_relative_eq!(c.cd, sample.cd, epsilon = 1e-12);
        }
    }

    #[test]
    fn out_of_range_fails_without_extrapolation() {
        let err = table().lookup(Angle::new::<degree>(25.0)).unwrap_err();
        assert_relative_eq!(err.alpha, 25_f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(err.max, 20_f64.to_radians(), epsilon = 1e-12);

        assert!(table().coefficients(f64::NAN).is_err());
    }

    #[test]
    fn clamp_holds_end_values() {
        let polar = table().with_extrapolation(Extrapolation::Clamp);

        let below = polar.lookup(Angle::new::<degree>(-40.0)).unwrap();
        assert_relative_eq!(below.cl, -0.8);

        let above = polar.lookup(Angle::new::<degree>(90.0)).unwrap();
        assert_relative_eq!(above.cd, 0.20);

        assert!(polar.coefficients(f64::NAN).is_err());
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            PolarTable::from_degrees(&[(0.0, 0.1, 0.01)]).unwrap_err(),
            PolarTableError::TooFewSamples(1)
        );
        assert_eq!(
            PolarTable::from_degrees(&[(0.0, 0.1, 0.01), (0.0, 0.2, 0.01)]).unwrap_err(),
            PolarTableError::NotIncreasing { index: 1 }
        );
        assert_eq!(
            PolarTable::from_degrees(&[(0.0, 0.1, 0.01), (1.0, f64::NAN, 0.01)]).unwrap_err(),
            PolarTableError::NotFinite { index: 1 }
        );
    }
}
