//! Buffered belief overrides awaiting the next tick.
//!
//! External belief sources push `(id, text)` pairs here at any time; the
//! simulation drains the inbox at the start of each step.

use crate::entity::EntityId;

/// Text pushed by an external belief source for one human.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalBelief {
    /// Target human.
    pub entity: EntityId,
    /// Replacement belief text.
    pub text: String,
}

/// Queue of [`ExternalBelief`] updates.
#[derive(Debug, Clone, Default)]
pub struct BeliefInbox {
    pending: Vec<ExternalBelief>,
}

impl BeliefInbox {
    /// Queues one override.
    pub fn push(&mut self, entity: EntityId, text: impl Into<String>) {
        self.pending.push(ExternalBelief {
            entity,
            text: text.into(),
        });
    }

    /// Queues several overrides.
    pub fn extend<I>(&mut self, beliefs: I)
    where
        I: IntoIterator<Item = ExternalBelief>,
    {
        self.pending.extend(beliefs);
    }

    /// Removes and yields every queued override in arrival order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, ExternalBelief> {
        self.pending.drain(..)
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of queued overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
