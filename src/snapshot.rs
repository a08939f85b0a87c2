//! Per-tick output handed to the renderer.
use serde::Serialize;

use crate::entity::{EntityId, Human};
use crate::goal::GoalKind;

/// What a renderer needs to draw one human.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    /// Identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Body centre.
    pub position: [f32; 3],
    /// Unit ground-plane heading.
    pub heading: [f32; 3],
    /// Visual yaw in radians.
    pub yaw: f32,
    /// Text to show above the body.
    pub belief: String,
    /// Current goal kind.
    pub goal: GoalKind,
}

impl From<&Human> for EntityView {
    fn from(human: &Human) -> Self {
        Self {
            id: human.id,
            name: human.name(),
            position: human.position.to_array(),
            heading: human.heading.to_array(),
            yaw: human.yaw,
            belief: human.belief.clone(),
            goal: human.goal.kind(),
        }
    }
}

/// Snapshot of the whole crowd after one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Number of ticks completed.
    pub tick: u64,
    /// Simulation clock.
    pub time: f32,
    /// Whether the void display mode is on.
    pub void_mode: bool,
    /// Every human, in creation order.
    pub entities: Vec<EntityView>,
}
