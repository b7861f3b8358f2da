//! Rotor aerodynamics models.
//!
//! This module contains models for the aerodynamic loading of wind turbine
//! rotors.

pub mod bem;
