#![cfg_attr(docsrs, feature(doc_cfg))]
//! Core of the wandering-humans sandbox.
//!
//! A crowd of simple humans walks a flat world. Each one perceives through a
//! view cone with line-of-sight occlusion, remembers recent sightings, picks
//! goals from a small state machine and steers with local separation. A
//! speech-bubble "belief" changes with every goal, arrival or passing
//! thought. Leaving the world radius trips a one-way void flag.
//!
//! [`Simulation`] owns the whole state and is driven one tick at a time,
//! either directly or through [`SandboxPlugin`] inside a Bevy app.
pub mod beliefs;
pub mod boundary;
pub mod config;
pub mod constants;
pub mod decision;
pub mod entity;
pub mod events;
pub mod goal;
pub mod inbox;
pub mod logging;
pub mod memory;
pub mod perception;
pub mod plugin;
pub mod rng;
pub mod simulation;
pub mod snapshot;
pub mod steering;
pub mod thought_feed;
pub mod vector_math;
pub use constants::*;

pub use boundary::{BoundaryReport, VoidFlag};
pub use config::{ConfigError, SimConfig};
pub use decision::{Transition, TransitionCause};
pub use entity::{EntityId, Human, Player, Subject};
pub use events::{BeliefEvent, BeliefOrigin, EventSink, LogSink, NullSink};
pub use goal::{Goal, GoalKind, Intent};
pub use inbox::BeliefInbox;
pub use logging::init as init_logging;
pub use memory::{MemoryBuffer, MemoryEntry};
pub use perception::{Perception, Sighting};
pub use plugin::{BeliefLabel, HumanId, PlayerCamera, SandboxPlugin, SandboxWorld, VoidMode};
pub use rng::{RandomSource, SequenceRandom};
pub use simulation::{PopulationError, Simulation};
pub use snapshot::{EntityView, Frame};
pub use thought_feed::ThoughtFeed;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use wanderers::prelude::*;
    //! ```

    pub use crate::{
        BeliefEvent, BeliefInbox, EventSink, Frame, LogSink, NullSink, SimConfig, Simulation,
    };
}
