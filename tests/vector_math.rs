//! Ground-plane vector helpers used by steering and perception.

use glam::Vec3;
use std::f32::consts::PI;
use wanderers::vector_math::{planar_direction, turn_towards, wrap_angle, yaw_of};

#[test]
fn planar_direction_rejects_vertical_vectors() {
    assert_eq!(planar_direction(Vec3::Y), None);
    assert_eq!(planar_direction(Vec3::new(f32::NAN, 0.0, 1.0)), None);
}

#[test]
fn planar_direction_drops_height() {
    let direction = planar_direction(Vec3::new(3.0, 7.0, 0.0)).expect("has a planar part");
    assert!((direction - Vec3::X).length() < 1e-6);
}

#[test]
fn wrapped_angles_stay_in_half_open_range() {
    for raw in [-7.0_f32, -PI, 0.0, PI, 4.0, 13.0] {
        let wrapped = wrap_angle(raw);
        assert!(wrapped > -PI - 1e-5 && wrapped <= PI + 1e-5, "{raw} -> {wrapped}");
    }
}

#[test]
fn turning_away_from_directly_behind_makes_progress() {
    let turned = turn_towards(Vec3::X, -Vec3::X, 0.1);
    assert!(turned.dot(-Vec3::X) > -1.0 + 1e-3);
    assert!((turned.length() - 1.0).abs() < 1e-5);
}

#[test]
fn yaw_points_along_heading() {
    assert!(yaw_of(Vec3::Z).abs() < 1e-6);
    assert!((yaw_of(Vec3::X) - PI / 2.0).abs() < 1e-6);
}
