//! Goal state machine.
//!
//! [`decide`] runs once per human per tick, after perception. It either keeps
//! the current goal or replaces it, in this order of precedence:
//!
//! 1. the goal lapsed: reselect;
//! 2. the player is in sight and not already watched: maybe start observing
//!    the player;
//! 3. wandering with humans in sight: maybe approach one of them;
//! 4. otherwise: occasionally reselect on a whim.
//!
//! [`check_arrival`] runs after movement and lapses targeted goals whose
//! target is within reach.

use std::f32::consts::TAU;

use glam::Vec3;
use log::debug;

use crate::beliefs;
use crate::config::{DurationRange, SimConfig};
use crate::entity::{Human, Subject};
use crate::goal::{Goal, Intent};
use crate::perception::Perception;
use crate::rng::RandomSource;
use crate::vector_math::planar_distance;

/// Why a goal was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TransitionCause {
    /// The previous goal lapsed.
    Expired,
    /// The player came into view.
    NoticedPlayer,
    /// Another human came into view while wandering.
    NoticedHuman,
    /// Spontaneous change of mind.
    Reconsidered,
}

/// A goal change together with the belief it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Why the goal changed.
    pub cause: TransitionCause,
    /// The new goal, already stored on the human.
    pub goal: Goal,
    /// The new belief, already stored on the human.
    pub belief: String,
}

fn lifetime<R: RandomSource + ?Sized>(now: f32, range: DurationRange, rng: &mut R) -> f32 {
    now + rng.range(range.min, range.max)
}

/// Picks a fresh goal for `human`.
///
/// Half of all picks wander towards a random point near the human. Of the
/// rest, half explore a random remembered position when memory is not empty.
/// Everything else idles.
#[must_use]
pub fn reselect<R: RandomSource + ?Sized>(
    human: &Human,
    now: f32,
    config: &SimConfig,
    rng: &mut R,
) -> Goal {
    let goals = &config.goals;
    if rng.chance(config.odds.wander_share) {
        let angle = rng.range(0.0, TAU);
        let reach = rng.range(0.0, goals.wander_radius);
        let target = human.position + Vec3::new(angle.cos(), 0.0, angle.sin()) * reach;
        return Goal::new(Intent::Wander { target }, lifetime(now, goals.wander, rng));
    }
    if !human.memory.is_empty() && rng.chance(config.odds.explore_share) {
        if let Some(entry) = rng.pick(human.memory.entries()) {
            let target = entry.position;
            return Goal::new(
                Intent::ExploreMemory { target },
                lifetime(now, goals.explore, rng),
            );
        }
    }
    Goal::idle(lifetime(now, goals.idle, rng))
}

fn adopt<R: RandomSource + ?Sized>(
    human: &mut Human,
    goal: Goal,
    cause: TransitionCause,
    rng: &mut R,
) -> Transition {
    let belief = beliefs::for_intent(&goal.intent, rng);
    debug!(
        "{} switches to {:?} until {:.2} ({:?})",
        human.id,
        goal.kind(),
        goal.expires,
        cause
    );
    human.goal = goal;
    human.belief.clone_from(&belief);
    Transition {
        cause,
        goal,
        belief,
    }
}

/// Evaluates the transition rules for one human.
///
/// Returns the transition taken, or `None` when the goal is kept.
pub fn decide<R: RandomSource + ?Sized>(
    human: &mut Human,
    perception: &Perception,
    now: f32,
    config: &SimConfig,
    rng: &mut R,
) -> Option<Transition> {
    if human.goal.is_expired(now) {
        let goal = reselect(human, now, config, rng);
        return Some(adopt(human, goal, TransitionCause::Expired, rng));
    }

    let observing_player = matches!(
        human.goal.intent,
        Intent::Observe {
            target: Subject::Player
        }
    );
    if !observing_player
        && perception.sees_player()
        && rng.chance(config.odds.observe_player * human.free_will)
    {
        let goal = Goal::new(
            Intent::Observe {
                target: Subject::Player,
            },
            lifetime(now, config.goals.observe, rng),
        );
        return Some(adopt(human, goal, TransitionCause::NoticedPlayer, rng));
    }

    if matches!(human.goal.intent, Intent::Wander { .. }) {
        let seen: Vec<_> = perception.humans().collect();
        if !seen.is_empty() && rng.chance(config.odds.approach) {
            if let Some(&target) = rng.pick(&seen) {
                let goal = Goal::new(
                    Intent::Approach { target },
                    lifetime(now, config.goals.approach, rng),
                );
                return Some(adopt(human, goal, TransitionCause::NoticedHuman, rng));
            }
        }
    }

    if rng.chance(config.odds.reconsider * human.free_will) {
        let goal = reselect(human, now, config, rng);
        return Some(adopt(human, goal, TransitionCause::Reconsidered, rng));
    }

    None
}

/// Lapses the goal once its target is within arrival distance.
///
/// Distance is measured on the ground plane so the raised player proxy can
/// be reached.
///
/// `target_position` is the resolved position of the goal's target, or
/// `None` when the goal has no target. Returns the arrival belief, already
/// stored on the human.
pub fn check_arrival<R: RandomSource + ?Sized>(
    human: &mut Human,
    target_position: Option<Vec3>,
    now: f32,
    config: &SimConfig,
    rng: &mut R,
) -> Option<String> {
    let target = target_position?;
    if human.goal.is_expired(now) {
        return None;
    }
    if planar_distance(human.position, target) >= config.goals.arrival_distance {
        return None;
    }
    human.goal.expire(now);
    let belief = beliefs::for_arrival(&human.goal.intent, rng);
    debug!("{} arrived ({:?})", human.id, human.goal.kind());
    human.belief.clone_from(&belief);
    Some(belief)
}

/// Updates awareness and doubt from this tick's perception.
///
/// Both scalars move exponentially towards one while stimulated and decay
/// towards zero otherwise, so they never leave `[0, 1]`.
pub fn update_mind(human: &mut Human, perception: &Perception, dt: f32, config: &SimConfig) {
    let mind = &config.mind;
    human.awareness = if perception.is_empty() {
        human.awareness * (1.0 - mind.awareness_decay * dt).clamp(0.0, 1.0)
    } else {
        human.awareness + (1.0 - human.awareness) * mind.awareness_gain
    }
    .clamp(0.0, 1.0);

    let unsettled = perception.sees_player() || perception.sees_edge;
    human.doubt = if unsettled {
        human.doubt + (1.0 - human.doubt) * mind.doubt_gain
    } else {
        human.doubt * (1.0 - mind.doubt_decay * dt).clamp(0.0, 1.0)
    }
    .clamp(0.0, 1.0);
}
