//! Utility helpers for tests.
//!
//! Builders for humans and crowds, a configuration with every random
//! transition switched off, and a few geometric assertions shared by the
//! integration tests.

use glam::Vec3;
use wanderers::{EntityId, Goal, Human, SimConfig, Simulation, BODY_HEIGHT};
use wanderers::rng::SequenceRandom;

/// Creates a human at `(x, BODY_HEIGHT, z)` facing `heading`.
///
/// The human walks at `speed` and its first goal expires far in the future.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use test_utils::human_at;
/// let human = human_at(3, 1.0, 2.0, Vec3::X, 1.5);
/// assert_eq!(human.id.into_inner(), 3);
/// assert!((human.position.y - 0.9).abs() < f32::EPSILON);
/// ```
pub fn human_at(id: u32, x: f32, z: f32, heading: Vec3, speed: f32) -> Human {
    Human::new(
        EntityId(id),
        Vec3::new(x, BODY_HEIGHT, z),
        heading,
        speed,
        f32::MAX,
    )
}

/// Creates a human wandering towards `target` until `expires`.
pub fn wanderer(id: u32, position: Vec3, target: Vec3, speed: f32, expires: f32) -> Human {
    Human::new(EntityId(id), position, target - position, speed, expires)
        .with_goal(Goal::wander(target, expires))
}

/// Default configuration with every random transition disabled.
///
/// Goals only change when they expire or are reached, and the frame delta
/// clamp is raised to one second so tests can take whole-second steps.
pub fn quiet_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.odds.observe_player = 0.0;
    config.odds.approach = 0.0;
    config.odds.reconsider = 0.0;
    config.odds.ambient_thought = 0.0;
    config.max_delta = 1.0;
    config
}

/// Builds a scripted simulation around `humans`.
///
/// # Panics
/// Panics if the crowd is empty or ids collide.
pub fn scripted(config: SimConfig, humans: Vec<Human>, sample: f32) -> Simulation<SequenceRandom> {
    match Simulation::from_humans(config, SequenceRandom::constant(sample), humans) {
        Ok(simulation) => simulation,
        Err(e) => panic!("invalid test crowd: {e}"),
    }
}

/// Player position far enough away that no human can see it.
pub const FAR_PLAYER: Vec3 = Vec3::new(0.0, 2.5, -25.0);

/// Asserts that `v` lies on the ground plane with unit length.
///
/// # Panics
/// Panics when either condition fails.
pub fn assert_unit_planar(v: Vec3) {
    assert!(v.y.abs() < 1e-5, "{v:?} has a vertical component");
    assert!((v.length() - 1.0).abs() < 1e-4, "{v:?} is not unit length");
}
