//! Heading and position updates.
//!
//! Steering turns the goal into a desired ground-plane direction, pushes it
//! away from crowded neighbours, then eases the stored heading towards the
//! result. Speed depends on the kind of goal.

use glam::Vec3;

use crate::config::SteeringConfig;
use crate::entity::Human;
use crate::goal::{GoalKind, Intent};
use crate::rng::RandomSource;
use crate::vector_math::{
    approach_angle, flatten, planar_direction, rotate_about_y, safe_normalize, turn_towards,
    yaw_of,
};

/// Direction the goal asks for.
///
/// `target_position` is the resolved position of the goal's target. Idle
/// humans, and humans whose target sits exactly on top of them, keep their
/// current heading; idle ones get a small random twist.
#[must_use]
pub fn desired_heading<R: RandomSource + ?Sized>(
    human: &Human,
    target_position: Option<Vec3>,
    config: &SteeringConfig,
    rng: &mut R,
) -> Vec3 {
    if matches!(human.goal.intent, Intent::Idle) {
        let twist = rng.range(-0.5, 0.5) * config.idle_jitter;
        return planar_direction(rotate_about_y(human.heading, twist)).unwrap_or(human.heading);
    }
    target_position
        .and_then(|target| planar_direction(target - human.position))
        .unwrap_or(human.heading)
}

/// Sum of pushes away from every neighbour closer than `radius`.
///
/// Each push is the unit vector pointing away from the neighbour scaled by
/// how deep inside the radius it stands. Neighbours sharing the exact same
/// spot give no direction and are skipped. The result is not normalised.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use wanderers::steering::separation_vector;
///
/// let push = separation_vector(Vec3::ZERO, [Vec3::new(1.0, 0.0, 0.0)], 2.0);
/// assert!(push.x < 0.0);
/// ```
#[must_use]
pub fn separation_vector(
    position: Vec3,
    neighbours: impl IntoIterator<Item = Vec3>,
    radius: f32,
) -> Vec3 {
    neighbours
        .into_iter()
        .filter_map(|other| {
            let away = flatten(position - other);
            let distance = away.length();
            if distance >= radius {
                return None;
            }
            safe_normalize(away).map(|unit| unit * (radius - distance))
        })
        .sum()
}

/// Separation push for `human` against the rest of the crowd.
#[must_use]
pub fn crowd_separation(human: &Human, crowd: &[Human], radius: f32) -> Vec3 {
    separation_vector(
        human.position,
        crowd
            .iter()
            .filter(|other| other.id != human.id)
            .map(|other| other.position),
        radius,
    )
}

/// Blends a separation push into the desired heading.
///
/// A zero push leaves the heading untouched; a push that exactly cancels it
/// does too.
#[must_use]
pub fn blend_separation(desired: Vec3, separation: Vec3, weight: f32) -> Vec3 {
    match safe_normalize(separation) {
        Some(push) => planar_direction(desired + push * weight).unwrap_or(desired),
        None => desired,
    }
}

/// Speed multiplier for a goal kind.
#[must_use]
pub fn speed_factor(kind: GoalKind, config: &SteeringConfig) -> f32 {
    match kind {
        GoalKind::Idle => 0.0,
        GoalKind::Observe => config.observe_speed_factor,
        GoalKind::Wander | GoalKind::Approach | GoalKind::ExploreMemory => 1.0,
    }
}

/// Eases the heading towards `desired`, moves the human and trails the yaw.
///
/// Returns the displacement applied this tick.
pub fn advance(human: &mut Human, desired: Vec3, dt: f32, config: &SteeringConfig) -> Vec3 {
    let turn = (config.turn_rate + config.awareness_turn_bonus * human.awareness).clamp(0.0, 1.0);
    human.heading = turn_towards(human.heading, desired, turn);

    let speed = human.speed * speed_factor(human.goal.kind(), config);
    let displacement = human.heading * speed * dt;
    if displacement.is_finite() {
        human.position += displacement;
    }

    human.yaw = approach_angle(human.yaw, yaw_of(human.heading), config.yaw_rate);
    displacement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::goal::Goal;
    use crate::rng::SequenceRandom;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> SteeringConfig {
        SteeringConfig::default()
    }

    #[rstest]
    fn separation_points_away_from_neighbour() {
        let push = separation_vector(Vec3::ZERO, [Vec3::new(1.0, 0.0, 0.0)], 2.0);
        assert_relative_eq!(push.x, -1.0);
        assert_relative_eq!(push.z, 0.0);
    }

    #[rstest]
    fn coincident_and_distant_neighbours_are_ignored() {
        let push = separation_vector(Vec3::ZERO, [Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)], 2.0);
        assert_eq!(push, Vec3::ZERO);
    }

    #[rstest]
    fn blend_keeps_unit_length() {
        let blended = blend_separation(Vec3::X, Vec3::new(0.0, 0.0, 3.0), 0.8);
        assert_relative_eq!(blended.length(), 1.0, epsilon = 1e-6);
        assert!(blended.z > 0.0);
        assert_eq!(blend_separation(Vec3::X, Vec3::ZERO, 0.8), Vec3::X);
    }

    #[rstest]
    fn cancelling_push_keeps_desired() {
        assert_eq!(blend_separation(Vec3::X, Vec3::NEG_X, 1.0), Vec3::X);
    }

    #[rstest]
    #[case(GoalKind::Idle, 0.0)]
    #[case(GoalKind::Observe, 0.25)]
    #[case(GoalKind::Wander, 1.0)]
    #[case(GoalKind::Approach, 1.0)]
    #[case(GoalKind::ExploreMemory, 1.0)]
    fn speed_depends_on_goal(config: SteeringConfig, #[case] kind: GoalKind, #[case] expected: f32) {
        assert_relative_eq!(speed_factor(kind, &config), expected);
    }

    #[rstest]
    fn idle_heading_stays_unit(config: SteeringConfig) {
        let human = Human::new(EntityId(0), Vec3::ZERO, Vec3::Z, 1.0, 10.0);
        let mut rng = SequenceRandom::new([0.0, 0.99, 0.3]);
        for _ in 0..3 {
            let desired = desired_heading(&human, None, &config, &mut rng);
            assert_relative_eq!(desired.length(), 1.0, epsilon = 1e-5);
            assert!(desired.angle_between(Vec3::Z) <= config.idle_jitter);
        }
    }

    #[rstest]
    fn idle_humans_stay_put(config: SteeringConfig) {
        let mut human = Human::new(EntityId(0), Vec3::ZERO, Vec3::X, 2.0, 10.0);
        let moved = advance(&mut human, Vec3::X, 1.0, &config);
        assert_eq!(moved, Vec3::ZERO);
    }

    #[rstest]
    fn target_on_top_keeps_heading(config: SteeringConfig) {
        let human = Human::new(EntityId(0), Vec3::ZERO, Vec3::Z, 1.0, 10.0)
            .with_goal(Goal::wander(Vec3::ZERO, 10.0));
        let mut rng = SequenceRandom::constant(0.5);
        assert_eq!(desired_heading(&human, Some(Vec3::ZERO), &config, &mut rng), Vec3::Z);
    }
}
