//! Type-level numeric constraints with zero runtime cost.
//!
//! Rotor inputs carry a handful of invariants (a blade count greater than
//! zero, a positive time step, a positive number of azimuth stations) that are
//! cheaper to check once when a value is built than on every solve.
//!
//! The [`StrictlyPositive`] marker is used with the generic
//! [`Constrained<T, C>`] wrapper, where `C` is the marker type implementing
//! [`Constraint<T>`]. It works with plain numbers and with [`uom`] quantities.

mod strictly_positive;

use std::marker::PhantomData;

use thiserror::Error;

pub use strictly_positive::StrictlyPositive;

/// A trait for enforcing numeric invariants at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
}

/// A wrapper enforcing a numeric constraint at construction time.
///
/// # Example
///
/// ```
/// use twine_bem::support::constraint::{Constrained, StrictlyPositive};
///
/// let blades = Constrained::<usize, StrictlyPositive>::new(3).unwrap();
/// assert_eq!(blades.into_inner(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, C: Constraint<T>> Constrained<T, C> {
    /// Returns a copy of the inner value.
    pub fn get(&self) -> T {
        self.value
    }
}

/// Returns a reference to the inner unconstrained value.
impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
