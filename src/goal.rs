//! Goals: what a human currently intends and until when.

use glam::Vec3;
use serde::Serialize;

use crate::entity::{EntityId, Subject};

/// What a human is trying to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Walk towards a random nearby point.
    Wander {
        /// Destination.
        target: Vec3,
    },
    /// Walk up to another human.
    Approach {
        /// Human being approached.
        target: EntityId,
    },
    /// Face and slowly drift towards something interesting.
    Observe {
        /// What is being watched.
        target: Subject,
    },
    /// Revisit the place a remembered sighting happened.
    ExploreMemory {
        /// Remembered position.
        target: Vec3,
    },
    /// Stand mostly still, turning idly.
    Idle,
}

/// Payload-free tag of an [`Intent`], used for display and speed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GoalKind {
    /// See [`Intent::Wander`].
    Wander,
    /// See [`Intent::Approach`].
    Approach,
    /// See [`Intent::Observe`].
    Observe,
    /// See [`Intent::ExploreMemory`].
    ExploreMemory,
    /// See [`Intent::Idle`].
    Idle,
}

/// Where a goal points, resolved against the world by the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalTarget {
    /// A fixed point.
    Point(Vec3),
    /// A moving subject.
    Subject(Subject),
}

impl Intent {
    /// Returns the payload-free tag.
    #[must_use]
    pub const fn kind(&self) -> GoalKind {
        match self {
            Self::Wander { .. } => GoalKind::Wander,
            Self::Approach { .. } => GoalKind::Approach,
            Self::Observe { .. } => GoalKind::Observe,
            Self::ExploreMemory { .. } => GoalKind::ExploreMemory,
            Self::Idle => GoalKind::Idle,
        }
    }

    /// Returns the concrete target, or `None` for [`Intent::Idle`].
    #[must_use]
    pub const fn target(&self) -> Option<GoalTarget> {
        match *self {
            Self::Wander { target } | Self::ExploreMemory { target } => {
                Some(GoalTarget::Point(target))
            }
            Self::Approach { target } => Some(GoalTarget::Subject(Subject::Human(target))),
            Self::Observe { target } => Some(GoalTarget::Subject(target)),
            Self::Idle => None,
        }
    }
}

/// An intent paired with the simulation time at which it lapses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    /// What the human is doing.
    pub intent: Intent,
    /// Absolute simulation time of expiry.
    pub expires: f32,
}

impl Goal {
    /// Creates a goal lapsing at `expires`.
    #[must_use]
    pub const fn new(intent: Intent, expires: f32) -> Self {
        Self { intent, expires }
    }

    /// An idle goal lapsing at `expires`.
    #[must_use]
    pub const fn idle(expires: f32) -> Self {
        Self::new(Intent::Idle, expires)
    }

    /// A wander goal towards `target`.
    #[must_use]
    pub const fn wander(target: Vec3, expires: f32) -> Self {
        Self::new(Intent::Wander { target }, expires)
    }

    /// Whether the goal has lapsed at time `now`.
    #[must_use]
    pub fn is_expired(&self, now: f32) -> bool {
        now >= self.expires
    }

    /// Forces the goal to lapse at `now`, never extending it.
    pub fn expire(&mut self, now: f32) {
        self.expires = self.expires.min(now);
    }

    /// Returns the payload-free tag.
    #[must_use]
    pub const fn kind(&self) -> GoalKind {
        self.intent.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn expiry_is_inclusive() {
        let goal = Goal::idle(3.0);
        assert!(!goal.is_expired(2.9));
        assert!(goal.is_expired(3.0));
    }

    #[rstest]
    fn expire_never_extends() {
        let mut goal = Goal::idle(1.0);
        goal.expire(5.0);
        assert!((goal.expires - 1.0).abs() < f32::EPSILON);
        goal.expire(0.5);
        assert!((goal.expires - 0.5).abs() < f32::EPSILON);
    }

    #[rstest]
    fn targets_follow_intent() {
        assert_eq!(Intent::Idle.target(), None);
        assert_eq!(
            Intent::Observe {
                target: Subject::Player
            }
            .target(),
            Some(GoalTarget::Subject(Subject::Player))
        );
        assert_eq!(
            Intent::Approach {
                target: EntityId(2)
            }
            .kind(),
            GoalKind::Approach
        );
    }
}
