use std::marker::PhantomData;

use super::LinearForce;

/// Extension trait for building and reading [`LinearForce`] values.
///
/// [`LinearForce`] has no unit module in [`uom`], so values are created from
/// and read back as their SI base value, newtons per meter.
pub trait LinearForceExt {
    /// Creates a force per unit span from a value in N/m.
    fn from_newtons_per_meter(value: f64) -> Self;

    /// Returns the force per unit span in N/m.
    fn newtons_per_meter(&self) -> f64;
}

impl LinearForceExt for LinearForce {
    fn from_newtons_per_meter(value: f64) -> Self {
        Self {
            dimension: PhantomData,
            units: PhantomData,
            value,
        }
    }

    fn newtons_per_meter(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Length, MassDensity, Velocity},
        length::meter,
        mass_density::kilogram_per_cubic_meter,
        velocity::meter_per_second,
    };

    #[test]
    fn dynamic_pressure_times_chord_is_a_linear_force() {
        let rho = MassDensity::new::<kilogram_per_cubic_meter>(1.2);
        let w = Velocity::new::<meter_per_second>(10.0);
        let chord = Length::new::<meter>(0.5);

        let load: LinearForce = rho * w * w * chord * 0.5;

        assert_relative_eq!(load.newtons_per_meter(), 30.0, epsilon = 1e-12);
    }

    #[test]
    fn round_trips_si_value() {
        let load = LinearForce::from_newtons_per_meter(-12.5);
        assert_relative_eq!(load.newtons_per_meter(), -12.5);
    }
}
