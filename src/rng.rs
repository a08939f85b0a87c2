//! Injectable randomness.
//!
//! Every probabilistic branch in the simulation draws from a
//! [`RandomSource`], so transitions can be replayed with a seeded generator
//! or scripted outright with [`SequenceRandom`].

use rand::{Rng, RngCore};

/// A source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next sample in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Returns `true` with probability `p`.
    ///
    /// A probability of zero never fires, even when the source yields zero.
    fn chance(&mut self, p: f32) -> bool {
        p > 0.0 && self.unit() < p
    }

    /// Returns a sample in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.unit()
    }

    /// Returns an index in `0..len`, or `None` when `len` is zero.
    fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss,
            reason = "len is a small collection size and the product is floored into range."
        )]
        let picked = (self.unit() * len as f32) as usize;
        Some(picked.min(len - 1))
    }

    /// Picks a uniformly random element of `items`.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).and_then(|i| items.get(i))
    }
}

impl<R: RngCore> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Deterministic source that cycles through a fixed list of samples.
///
/// Samples are clamped into `[0, 1)`. An empty list behaves like a source
/// that always yields `0.5`.
///
/// # Examples
/// ```
/// use wanderers::rng::{RandomSource, SequenceRandom};
///
/// let mut rng = SequenceRandom::new([0.1, 0.9]);
/// assert!(rng.chance(0.5));
/// assert!(!rng.chance(0.5));
/// assert!(rng.chance(0.5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    samples: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    /// Creates a source replaying `samples` in order, forever.
    #[must_use]
    pub fn new(samples: impl IntoIterator<Item = f32>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Creates a source that always yields `value`.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new([value])
    }

    /// Number of samples drawn so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn unit(&mut self) -> f32 {
        let value = if self.samples.is_empty() {
            0.5
        } else {
            self.samples
                .get(self.cursor % self.samples.len())
                .copied()
                .unwrap_or(0.5)
        };
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
