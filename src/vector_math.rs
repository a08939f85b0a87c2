//! Planar vector helpers.
//!
//! Humans steer on the ground plane, so most helpers drop the vertical
//! component before doing anything else. All of them return a fallback
//! instead of a NaN when handed degenerate input.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use crate::constants::DIRECTION_EPSILON;

/// Drops the vertical component of `v`.
#[must_use]
pub const fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Normalises `v`, or returns `None` when it is non-finite or near zero.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use wanderers::vector_math::safe_normalize;
///
/// let unit = safe_normalize(Vec3::new(3.0, 0.0, 4.0)).unwrap();
/// assert!((unit.x - 0.6).abs() < 1e-6);
/// assert!(safe_normalize(Vec3::ZERO).is_none());
/// assert!(safe_normalize(Vec3::new(f32::NAN, 1.0, 0.0)).is_none());
/// ```
#[must_use]
pub fn safe_normalize(v: Vec3) -> Option<Vec3> {
    if !v.is_finite() || v.length_squared() <= DIRECTION_EPSILON * DIRECTION_EPSILON {
        return None;
    }
    v.try_normalize()
}

/// Returns the unit ground-plane direction of `v`, if it has one.
#[must_use]
pub fn planar_direction(v: Vec3) -> Option<Vec3> {
    safe_normalize(flatten(v))
}

/// Planar distance between two points.
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(a - b).length()
}

/// Rotates `v` about the vertical axis by `angle` radians.
#[must_use]
pub fn rotate_about_y(v: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * v
}

/// Wraps an angle into `(-PI, PI]`.
///
/// # Examples
/// ```
/// use std::f32::consts::PI;
/// use wanderers::vector_math::wrap_angle;
///
/// assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
/// assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
/// ```
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Yaw of a ground-plane heading, measured from +Z towards +X.
#[must_use]
pub fn yaw_of(heading: Vec3) -> f32 {
    heading.x.atan2(heading.z)
}

/// Moves `current` towards `target` by `factor` of the shortest arc.
///
/// The result is wrapped so repeated calls never snap across the
/// `-PI`/`PI` seam.
#[must_use]
pub fn approach_angle(current: f32, target: f32, factor: f32) -> f32 {
    wrap_angle(current + wrap_angle(target - current) * factor)
}

/// Eases unit heading `current` towards unit heading `target` by `factor`.
///
/// Plain interpolation never leaves a heading that points exactly away from
/// its target, so that case rotates about the vertical axis instead. The
/// result is always a unit ground-plane vector; degenerate input returns
/// `current`.
#[must_use]
pub fn turn_towards(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    if current.dot(target) < -1.0 + 1e-4 {
        return planar_direction(rotate_about_y(current, PI * factor)).unwrap_or(current);
    }
    planar_direction(current.lerp(target, factor)).unwrap_or(current)
}

/// Angle in radians between two ground-plane directions.
///
/// Returns zero when either input has no planar direction.
#[must_use]
pub fn planar_angle_between(a: Vec3, b: Vec3) -> f32 {
    match (planar_direction(a), planar_direction(b)) {
        (Some(ua), Some(ub)) => ua.dot(ub).clamp(-1.0, 1.0).acos(),
        _ => 0.0,
    }
}
