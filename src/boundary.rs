//! World boundary and the one-way void flag.
//!
//! Any tracked position outside the world radius switches the void display
//! mode on. Nothing ever switches it back off. Humans found outside are
//! turned back towards the origin but never teleported.

use glam::Vec3;
use log::info;

use crate::entity::{EntityId, Human, Player};
use crate::vector_math::{flatten, planar_direction, turn_towards};

/// Global cosmetic display mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct VoidFlag {
    active: bool,
}

impl VoidFlag {
    /// Whether the void mode is on.
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.active
    }

    /// Turns the mode on. Returns `true` only on the call that flipped it.
    pub fn trip(&mut self) -> bool {
        let flipped = !self.active;
        self.active = true;
        flipped
    }
}

/// Outcome of one boundary pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryReport {
    /// Whether this pass flipped the void flag on.
    pub entered_void: bool,
    /// Whether the player proxy was outside.
    pub player_outside: bool,
    /// Humans found outside, in crowd order.
    pub humans_outside: Vec<EntityId>,
}

/// Whether `position` lies outside `radius` on the ground plane.
#[must_use]
pub fn is_outside(position: Vec3, radius: f32) -> bool {
    flatten(position).length() > radius
}

/// Checks the player and every human against the world radius.
///
/// Trips `flag` when anything is outside, and eases out-of-bounds headings
/// towards the origin by `turn`. Calling it again without state changes
/// leaves the flag untouched.
pub fn check_boundaries(
    flag: &mut VoidFlag,
    player: &Player,
    humans: &mut [Human],
    world_radius: f32,
    turn: f32,
) -> BoundaryReport {
    let mut report = BoundaryReport {
        player_outside: is_outside(player.position, world_radius),
        ..BoundaryReport::default()
    };

    for human in humans.iter_mut() {
        if !is_outside(human.position, world_radius) {
            continue;
        }
        report.humans_outside.push(human.id);
        if let Some(inward) = planar_direction(-human.position) {
            human.heading = turn_towards(human.heading, inward, turn);
        }
    }

    if report.player_outside || !report.humans_outside.is_empty() {
        report.entered_void = flag.trip();
        if report.entered_void {
            if report.player_outside {
                info!("the watcher entered the void");
            }
            for id in &report.humans_outside {
                info!("{id} left the world; void triggered");
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn human_at(x: f32, heading: Vec3) -> Human {
        Human::new(EntityId(0), Vec3::new(x, 0.9, 0.0), heading, 1.0, 1.0)
    }

    #[rstest]
    fn inside_world_leaves_flag_off() {
        let mut flag = VoidFlag::default();
        let mut humans = vec![human_at(10.0, Vec3::X)];
        let report = check_boundaries(&mut flag, &Player::default(), &mut humans, 30.0, 0.12);
        assert!(!flag.is_active());
        assert!(!report.entered_void);
        assert_eq!(humans.first().map(|h| h.heading), Some(Vec3::X));
    }

    #[rstest]
    fn flag_flips_once() {
        let mut flag = VoidFlag::default();
        let mut humans = vec![human_at(31.0, Vec3::X)];
        let first = check_boundaries(&mut flag, &Player::default(), &mut humans, 30.0, 0.12);
        let second = check_boundaries(&mut flag, &Player::default(), &mut humans, 30.0, 0.12);
        assert!(first.entered_void);
        assert!(!second.entered_void);
        assert!(flag.is_active());
    }

    #[rstest]
    fn outside_human_turns_inward_without_teleport() {
        let mut flag = VoidFlag::default();
        let mut humans = vec![human_at(31.0, Vec3::X)];
        check_boundaries(&mut flag, &Player::default(), &mut humans, 30.0, 0.12);
        let human = humans.first().expect("one human");
        assert!(human.heading.x < 1.0);
        assert!((human.heading.length() - 1.0).abs() < 1e-5);
        assert!((human.position.x - 31.0).abs() < f32::EPSILON);
    }

    #[rstest]
    fn player_outside_trips_flag() {
        let mut flag = VoidFlag::default();
        let player = Player::new(Vec3::new(0.0, 2.5, 40.0));
        let report = check_boundaries(&mut flag, &player, &mut [], 30.0, 0.12);
        assert!(report.player_outside);
        assert!(flag.is_active());
    }
}
