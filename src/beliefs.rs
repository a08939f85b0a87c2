//! Fixed pools of belief text.
//!
//! Each goal transition and arrival picks a line from its own pool. Lines
//! that mention someone are built around the target's display name.

use crate::entity::{EntityId, Subject};
use crate::goal::Intent;
use crate::perception::Perception;
use crate::rng::RandomSource;

/// Lines drawn when nothing in particular is happening.
pub const AMBIENT: &[&str] = &[
    "I exist.",
    "I must move.",
    "Who watches?",
    "Am I code?",
    "What is purpose?",
];

/// Lines drawn when the edge of the world is in sight.
pub const EDGE: &[&str] = &[
    "The world ends there...",
    "Nothing past the green.",
    "Why does the ground stop?",
];

/// Lines drawn when picking a wander target.
pub const WANDER: &[&str] = &[
    "I should walk somewhere.",
    "Maybe over there.",
    "I must keep moving to stay alive.",
];

/// Lines drawn when going back to a remembered place.
pub const EXPLORE: &[&str] = &[
    "I remember something over there.",
    "Was it real? I should check.",
    "Something happened there.",
];

/// Lines drawn when settling into idleness.
pub const IDLE: &[&str] = &["I will wait.", "Let me think.", "Stillness."];

/// Lines drawn when the watcher is noticed.
pub const NOTICE_PLAYER: &[&str] = &[
    "Is someone watching me?",
    "That one moves differently.",
    "Who are you?",
];

/// Lines drawn on reaching the watcher.
pub const MEET_PLAYER: &[&str] = &[
    "You are not like us.",
    "Are you the one who watches?",
    "Maybe I'm in a simulation.",
];

/// Lines drawn on reaching a place.
pub const REACH_PLACE: &[&str] = &["Nothing here.", "I made it.", "Is this where I was going?"];

/// Fallback when a pool is empty.
const FALLBACK: &str = "...";

fn draw<R: RandomSource + ?Sized>(pool: &[&str], rng: &mut R) -> String {
    rng.pick(pool).copied().unwrap_or(FALLBACK).to_owned()
}

/// Belief spoken when a human adopts `intent`.
#[must_use]
pub fn for_intent<R: RandomSource + ?Sized>(intent: &Intent, rng: &mut R) -> String {
    match intent {
        Intent::Wander { .. } => draw(WANDER, rng),
        Intent::ExploreMemory { .. } => draw(EXPLORE, rng),
        Intent::Idle => draw(IDLE, rng),
        Intent::Observe {
            target: Subject::Player,
        } => draw(NOTICE_PLAYER, rng),
        Intent::Observe {
            target: Subject::Human(id),
        } => sighting(*id),
        Intent::Approach { target } => {
            let lines = [
                format!("Who is {target}?"),
                format!("I should talk to {target}."),
                format!("{target} looks familiar."),
            ];
            rng.pick(&lines).cloned().unwrap_or_else(|| FALLBACK.to_owned())
        }
    }
}

/// Belief spoken when a human reaches the target of `intent`.
#[must_use]
pub fn for_arrival<R: RandomSource + ?Sized>(intent: &Intent, rng: &mut R) -> String {
    match intent.target() {
        Some(crate::goal::GoalTarget::Subject(Subject::Player)) => draw(MEET_PLAYER, rng),
        Some(crate::goal::GoalTarget::Subject(Subject::Human(id))) => {
            let lines = [
                format!("Hello, {id}."),
                format!("{id} feels real."),
                format!("Do you think, {id}?"),
            ];
            rng.pick(&lines).cloned().unwrap_or_else(|| FALLBACK.to_owned())
        }
        Some(crate::goal::GoalTarget::Point(_)) | None => draw(REACH_PLACE, rng),
    }
}

/// Belief of a human looking straight at `seen`.
#[must_use]
pub fn sighting(seen: EntityId) -> String {
    format!("I see {seen}")
}

/// An ambient thought shaped by what is in view.
///
/// The nearest human in sight is named outright. Otherwise the edge pool is
/// used when the edge is in sight, and the ambient pool when it is not.
#[must_use]
pub fn ambient<R: RandomSource + ?Sized>(perception: &Perception, rng: &mut R) -> String {
    if let Some(nearest) = perception.humans().next() {
        sighting(nearest)
    } else if perception.sees_edge {
        draw(EDGE, rng)
    } else {
        draw(AMBIENT, rng)
    }
}
