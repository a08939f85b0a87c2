//! Periodic external thoughts.
//!
//! Stands in for an out-of-band belief service: on a fixed interval it
//! pushes a fresh thought for every known human into a [`BeliefInbox`].

use crate::entity::EntityId;
use crate::inbox::BeliefInbox;
use crate::rng::RandomSource;

/// Lines the feed draws from.
pub const FEED_THOUGHTS: &[&str] = &[
    "I move, therefore I exist.",
    "I think I am human.",
    "Why do I always walk?",
    "Is someone watching me?",
    "Maybe I'm in a simulation.",
    "I must keep moving to stay alive.",
];

/// Interval-driven external belief source.
#[derive(Debug, Clone)]
pub struct ThoughtFeed {
    interval: f32,
    elapsed: f32,
}

impl ThoughtFeed {
    /// Creates a feed firing every `interval` seconds.
    ///
    /// Non-positive intervals are raised to a small minimum so the feed
    /// cannot fire on every call.
    #[must_use]
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.01),
            elapsed: 0.0,
        }
    }

    /// Advances the feed clock by `dt`.
    ///
    /// When an interval has passed, queues one thought per id and returns
    /// `true`. At most one batch is queued per call.
    pub fn poll<R, I>(&mut self, dt: f32, ids: I, rng: &mut R, inbox: &mut BeliefInbox) -> bool
    where
        R: RandomSource + ?Sized,
        I: IntoIterator<Item = EntityId>,
    {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed %= self.interval;
        for id in ids {
            if let Some(text) = rng.pick(FEED_THOUGHTS) {
                inbox.push(id, *text);
            }
        }
        true
    }
}
