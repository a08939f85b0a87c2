//! Time-bounded memory of recent sightings.
//!
//! The buffer is append-only apart from pruning. Sightings arrive in
//! non-decreasing time order, so insertion order is also time order and the
//! prune only ever removes a prefix.

use glam::Vec3;
use serde::Serialize;

use crate::entity::{EntityId, Subject};

/// What kind of thing a memory records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObservationKind {
    /// Another human was seen.
    Human,
    /// The player proxy was seen.
    Player,
}

/// One remembered sighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryEntry {
    /// Simulation time of the sighting.
    pub time: f32,
    /// What was seen.
    pub observed: Subject,
    /// Where it was when seen.
    pub position: Vec3,
}

impl MemoryEntry {
    /// Identifier of the observed human, if it was a human.
    #[must_use]
    pub const fn observed_id(&self) -> Option<EntityId> {
        self.observed.human()
    }

    /// Kind of the observed subject.
    #[must_use]
    pub const fn kind(&self) -> ObservationKind {
        match self.observed {
            Subject::Human(_) => ObservationKind::Human,
            Subject::Player => ObservationKind::Player,
        }
    }
}

/// Rolling log of sightings.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    entries: Vec<MemoryEntry>,
}

impl MemoryBuffer {
    /// Appends a sighting. Repeated sightings are kept as separate entries.
    pub fn record(&mut self, time: f32, observed: Subject, position: Vec3) {
        self.entries.push(MemoryEntry {
            time,
            observed,
            position,
        });
    }

    /// Drops every entry older than `window` relative to `now`.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self, now: f32, window: f32) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| now - entry.time <= window);
        before - self.entries.len()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    /// Number of remembered sightings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest remaining timestamp.
    #[must_use]
    pub fn oldest(&self) -> Option<f32> {
        self.entries.first().map(|entry| entry.time)
    }
}
