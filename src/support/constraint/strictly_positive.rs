use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// # Examples
///
/// ```
/// use twine_bem::support::constraint::{Constrained, StrictlyPositive};
/// use uom::si::{f64::Time, time::second};
///
/// let dt = StrictlyPositive::new(Time::new::<second>(0.1)).unwrap();
/// assert_eq!(dt.into_inner().get::<second>(), 0.1);
///
/// assert!(Constrained::<usize, StrictlyPositive>::new(0).is_err());
/// assert!(StrictlyPositive::new(-1.0).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}
