//! Simulated humans and the player proxy.
use std::fmt;

use glam::Vec3;
use serde::Serialize;

use crate::goal::Goal;
use crate::memory::MemoryBuffer;

/// Stable identifier of a human, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Human_{}", self.0)
    }
}

/// Anything a human can look at: another human or the player proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Subject {
    /// Another simulated human.
    Human(EntityId),
    /// The camera-driven player proxy.
    Player,
}

impl Subject {
    /// Returns the human id, if the subject is a human.
    #[must_use]
    pub const fn human(self) -> Option<EntityId> {
        match self {
            Self::Human(id) => Some(id),
            Self::Player => None,
        }
    }

    /// Whether the subject is the player proxy.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human(id) => id.fmt(f),
            Self::Player => f.write_str("the watcher"),
        }
    }
}

/// One autonomous human.
///
/// All fields are owned by the [`crate::Simulation`] that created the human;
/// perception of other humans only ever reads them.
#[derive(Debug, Clone)]
pub struct Human {
    /// Identifier, unique within a simulation.
    pub id: EntityId,
    /// Body centre.
    pub position: Vec3,
    /// Unit ground-plane heading.
    pub heading: Vec3,
    /// Visual yaw in `(-PI, PI]`, trailing the heading.
    pub yaw: f32,
    /// Walking speed in units per second.
    pub speed: f32,
    /// Scales how readily the human abandons or changes goals, in `[0, 1]`.
    pub free_will: f32,
    /// Current intent and its expiry.
    pub goal: Goal,
    /// Text shown above the human.
    pub belief: String,
    /// Recent sightings.
    pub memory: MemoryBuffer,
    /// Grows while anything is perceived, decays otherwise. In `[0, 1]`.
    pub awareness: f32,
    /// Grows on unsettling sightings (the watcher, the world's edge). In `[0, 1]`.
    pub doubt: f32,
    /// Set once an external belief source has written this human's text.
    pub externally_voiced: bool,
}

impl Human {
    /// Creates a human at `position` facing `heading`.
    ///
    /// The heading is flattened and normalised; a degenerate heading falls
    /// back to `+X`. The initial goal is [`Goal::idle`] expiring at
    /// `first_expiry`.
    #[must_use]
    pub fn new(id: EntityId, position: Vec3, heading: Vec3, speed: f32, first_expiry: f32) -> Self {
        let unit = crate::vector_math::planar_direction(heading).unwrap_or(Vec3::X);
        Self {
            id,
            position,
            heading: unit,
            yaw: crate::vector_math::yaw_of(unit),
            speed,
            free_will: 0.5,
            goal: Goal::idle(first_expiry),
            belief: String::from("I exist."),
            memory: MemoryBuffer::default(),
            awareness: 0.0,
            doubt: 0.0,
            externally_voiced: false,
        }
    }

    /// Builder-style override of [`Human::free_will`], clamped to `[0, 1]`.
    #[must_use]
    pub fn with_free_will(mut self, free_will: f32) -> Self {
        self.free_will = free_will.clamp(0.0, 1.0);
        self
    }

    /// Builder-style override of the current goal.
    #[must_use]
    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goal = goal;
        self
    }

    /// Display name, e.g. `Human_3`.
    #[must_use]
    pub fn name(&self) -> String {
        self.id.to_string()
    }
}

/// Position-only stand-in for the camera.
///
/// Humans can see it, but it runs no state machine of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Camera position.
    pub position: Vec3,
}

impl Player {
    /// Creates a proxy at `position`.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec3::from_array(crate::constants::PLAYER_START))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn new_human_normalises_heading() {
        let human = Human::new(EntityId(1), Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0), 1.0, 2.0);
        assert_relative_eq!(human.heading.length(), 1.0);
        assert_relative_eq!(human.heading.y, 0.0);
    }

    #[rstest]
    fn degenerate_heading_falls_back_to_x() {
        let human = Human::new(EntityId(1), Vec3::ZERO, Vec3::ZERO, 1.0, 2.0);
        assert_eq!(human.heading, Vec3::X);
    }

    #[rstest]
    fn names_follow_ids() {
        let human = Human::new(EntityId(7), Vec3::ZERO, Vec3::X, 1.0, 0.0);
        assert_eq!(human.name(), "Human_7");
        assert_eq!(Subject::Human(EntityId(7)).to_string(), "Human_7");
    }
}
