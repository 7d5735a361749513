use approx::assert_relative_eq;
use galax_coords::{PosCar, PosVelCar, PosVelSph};
use galax_particles::{ParticleError, ParticleSet};

fn spherical_sample() -> ParticleSet<PosVelSph> {
    let mut set = ParticleSet::new();
    set.push(
        PosVelSph::new(8.0, std::f64::consts::FRAC_PI_2, 0.0, 0.0, 0.0, 220.0),
        3.0,
    )
    .unwrap();
    set.push(
        PosVelSph::new(2.0, 0.4, 1.2, 30.0, -10.0, 150.0),
        1.0,
    )
    .unwrap();
    set.push(
        PosVelSph::new(15.0, 2.0, -2.5, -5.0, 12.0, 90.0),
        6.0,
    )
    .unwrap();
    set
}

#[test]
fn compound_conversion_drops_velocity_and_changes_frame() {
    // position+velocity in spherical -> position-only in Cartesian, the
    // compound case: one strategy covers both the frame change and the
    // kind change.
    let source = spherical_sample();
    let converted: ParticleSet<PosCar> = ParticleSet::from(&source);

    assert_eq!(converted.len(), source.len());
    assert_relative_eq!(
        converted.total_mass(),
        source.total_mass(),
        max_relative = 1e-14
    );

    // order preserved: element i is the transform of source element i
    for i in 0..source.len() {
        let expected = PosCar::from(source.point(i).unwrap().position());
        let got = converted.point(i).unwrap();
        assert_relative_eq!(got.x, expected.x, max_relative = 1e-13);
        assert_relative_eq!(got.y, expected.y, max_relative = 1e-13);
        assert_relative_eq!(got.z, expected.z, max_relative = 1e-13);
    }

    // the first particle sits on the x-axis in the equatorial plane
    let first = converted.point(0).unwrap();
    assert_relative_eq!(first.x, 8.0, max_relative = 1e-13);
    assert_relative_eq!(first.y, 0.0, epsilon = 1e-12);
}

#[test]
fn cross_frame_round_trip_preserves_the_set() {
    let source = spherical_sample();
    let cartesian: ParticleSet<PosVelCar> = ParticleSet::from(&source);
    let back: ParticleSet<PosVelSph> = ParticleSet::from(&cartesian);

    assert_eq!(back.len(), source.len());
    for i in 0..source.len() {
        let a = source.point(i).unwrap();
        let b = back.point(i).unwrap();
        assert_relative_eq!(a.r, b.r, max_relative = 1e-12);
        assert_relative_eq!(a.theta, b.theta, max_relative = 1e-12);
        assert_relative_eq!(a.vr, b.vr, max_relative = 1e-10);
        assert_relative_eq!(a.vtheta, b.vtheta, max_relative = 1e-10);
        assert_relative_eq!(a.vphi, b.vphi, max_relative = 1e-10);
    }
}

#[test]
fn negative_weight_is_rejected_with_the_set_intact() {
    let mut set = spherical_sample();
    let before = set.total_mass();
    let err = set
        .push(PosVelSph::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0), -0.5)
        .unwrap_err();
    assert_eq!(err, ParticleError::NegativeMass(-0.5));
    assert_eq!(set.len(), 3);
    assert_relative_eq!(set.total_mass(), before);
}
