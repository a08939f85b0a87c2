//! Fire-and-forget notifications of belief changes.
//!
//! The simulation never waits on a sink and never retries. Sinks must not
//! reach back into the simulation.

use glam::Vec3;
use log::info;
use serde::Serialize;

use crate::decision::TransitionCause;
use crate::entity::EntityId;

/// What produced a belief change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BeliefOrigin {
    /// A goal transition.
    Goal(TransitionCause),
    /// A targeted goal was reached.
    Arrival,
    /// A spontaneous ambient thought.
    Ambient,
    /// An external belief source overwrote the text.
    External,
}

/// One belief change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefEvent {
    /// Human whose belief changed.
    pub entity: EntityId,
    /// Where the human stood.
    pub position: [f32; 3],
    /// The new text.
    pub text: String,
    /// What caused it.
    pub origin: BeliefOrigin,
}

impl BeliefEvent {
    /// Creates an event for `entity` standing at `position`.
    #[must_use]
    pub fn new(entity: EntityId, position: Vec3, text: impl Into<String>, origin: BeliefOrigin) -> Self {
        Self {
            entity,
            position: position.to_array(),
            text: text.into(),
            origin,
        }
    }
}

/// Receives belief changes as they happen.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink {
    /// Called once per belief change.
    fn belief_changed(&mut self, event: &BeliefEvent);
}

/// Sink that writes every event to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn belief_changed(&mut self, event: &BeliefEvent) {
        let [x, y, z] = event.position;
        info!(
            "[{}] ({x:.1}, {y:.1}, {z:.1}) {:?}: {}",
            event.entity, event.origin, event.text
        );
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn belief_changed(&mut self, _event: &BeliefEvent) {}
}

impl EventSink for Vec<BeliefEvent> {
    fn belief_changed(&mut self, event: &BeliefEvent) {
        self.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<BeliefEvent> = Vec::new();
        sink.belief_changed(&BeliefEvent::new(EntityId(1), Vec3::ZERO, "a", BeliefOrigin::Ambient));
        sink.belief_changed(&BeliefEvent::new(EntityId(2), Vec3::X, "b", BeliefOrigin::Arrival));
        let texts: Vec<_> = sink.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["a", "b"]);
    }

    #[rstest]
    fn events_serialise_with_origin() {
        let event = BeliefEvent::new(
            EntityId(3),
            Vec3::new(1.0, 0.9, 2.0),
            "I exist.",
            BeliefOrigin::Goal(TransitionCause::Expired),
        );
        let json = serde_json::to_string(&event).expect("serialisable");
        assert!(json.contains("\"Expired\""), "{json}");
        assert!(json.contains("I exist."), "{json}");
    }
}
