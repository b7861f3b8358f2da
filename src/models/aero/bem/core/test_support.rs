use std::sync::Arc;

use uom::si::{
    angle::degree,
    angular_velocity::radian_per_second,
    f64::{Angle, AngularVelocity, Length, Velocity},
    length::meter,
    velocity::meter_per_second,
};

use crate::support::{
    aero::{Airfoil, CorrectionChain, PolarTable, Rotor, Section},
    constraint::StrictlyPositive,
};

use super::{BemSolver, SolverConfig};

/// Thin airfoil polar covering the full circle of attack angles.
fn airfoil() -> Arc<Airfoil> {
    let polar = PolarTable::from_degrees(&[
        (-180.0, 0.0, 0.05),
        (-150.0, 0.8, 0.4),
        (-90.0, 0.0, 1.8),
        (-30.0, -0.8, 0.5),
        (-10.0, -0.8, 0.02),
        (0.0, 0.3, 0.01),
        (10.0, 1.3, 0.02),
        (16.0, 1.5, 0.05),
        (30.0, 1.0, 0.5),
        (90.0, 0.0, 1.8),
        (150.0, -0.8, 0.4),
        (180.0, 0.0, 0.05),
    ])
    .expect("test polar is valid");
    Arc::new(Airfoil::new("test", polar))
}

/// Three-bladed rotor with a 1 m hub, a 10 m tip and sections at 3, 6 and 9 m.
pub(super) fn rotor() -> Rotor {
    rotor_with(&[(3.0, 1.0, 12.0), (6.0, 0.8, 5.0), (9.0, 0.5, 1.0)])
}

/// Test rotor with the given `(radius, chord, twist in degrees)` sections.
pub(super) fn rotor_with(rows: &[(f64, f64, f64)]) -> Rotor {
    build(airfoil(), rows)
}

/// The [`rotor`] geometry with every section on `polar`.
pub(super) fn rotor_with_polar(polar: PolarTable) -> Rotor {
    build(
        Arc::new(Airfoil::new("custom", polar)),
        &[(3.0, 1.0, 12.0), (6.0, 0.8, 5.0), (9.0, 0.5, 1.0)],
    )
}

fn build(airfoil: Arc<Airfoil>, rows: &[(f64, f64, f64)]) -> Rotor {
    let sections = rows
        .iter()
        .map(|&(r, c, twist)| {
            Section::new(
                Length::new::<meter>(r),
                Length::new::<meter>(c),
                Angle::new::<degree>(twist),
                Arc::clone(&airfoil),
            )
        })
        .collect();

    Rotor::new(
        StrictlyPositive::new(3).expect("blade count is positive"),
        Length::new::<meter>(1.0),
        Length::new::<meter>(10.0),
        sections,
    )
    .expect("test rotor is valid")
}

/// Zero-pitch condition with wind in m/s and rotor speed in rad/s.
pub(super) fn condition(wind: f64, omega: f64) -> super::OperatingCondition {
    super::OperatingCondition::new(
        Velocity::new::<meter_per_second>(wind),
        AngularVelocity::new::<radian_per_second>(omega),
        Angle::new::<degree>(0.0),
    )
}

/// Solver for the test rotor with the given correction identifiers.
pub(super) fn solver(ids: &[&str], config: SolverConfig) -> BemSolver {
    BemSolver::new(
        Arc::new(rotor()),
        CorrectionChain::from_ids(ids).expect("test chain is valid"),
        config,
    )
    .expect("test solver is valid")
}
