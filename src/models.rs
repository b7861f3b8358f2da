//! Public Twine models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the actual computation and domain logic lives. The `core` module is an
//! implementation detail; the model module re-exports the types callers need.
//!
//! The [`twine_core::Model`] implementation is a thin adapter that delegates
//! to the model-specific core API.

pub mod aero;
