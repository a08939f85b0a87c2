//! Default tuning values for the sandbox.
//!
//! These mirror the numbers the sketch shipped with. [`crate::SimConfig`]
//! copies them into its defaults so every value can be overridden at
//! runtime.

use std::f32::consts::FRAC_PI_6;

/// Number of humans spawned at start-up.
pub const HUMAN_COUNT: usize = 20;
/// Planar radius of the playable world.
pub const WORLD_RADIUS: f32 = 30.0;
/// Fraction of the world radius used as the spawn square's side.
pub const SPAWN_SPREAD: f32 = 0.6;
/// Height at which human bodies stand.
pub const BODY_HEIGHT: f32 = 0.9;
/// Where the player proxy starts when no input is supplied.
pub const PLAYER_START: [f32; 3] = [0.0, 2.5, 8.0];
/// Largest frame delta a single tick may consume.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Half-angle of the vision cone in radians.
pub const FOV_HALF_ANGLE: f32 = FRAC_PI_6;
/// Maximum sight distance.
pub const VIEW_RANGE: f32 = 8.0;
/// Radius of the sphere standing in for a human's body during ray tests.
pub const BODY_RADIUS: f32 = 0.5;
/// Radius of the sphere standing in for the player proxy.
pub const PLAYER_RADIUS: f32 = 0.4;

/// How long a sighting stays in memory.
pub const MEMORY_WINDOW: f32 = 6.0;

/// Distance below which a targeted goal counts as reached.
pub const ARRIVAL_DISTANCE: f32 = 1.3;
/// Radius around the current position used to pick wander targets.
pub const WANDER_RADIUS: f32 = 10.0;

/// Probability scale for noticing the player, multiplied by free will.
pub const OBSERVE_PLAYER_CHANCE: f32 = 0.35;
/// Probability of approaching a seen human while wandering.
pub const APPROACH_CHANCE: f32 = 0.25;
/// Probability scale for spontaneous reconsideration, multiplied by free will.
pub const RECONSIDER_CHANCE: f32 = 0.01;
/// Per-tick probability of an ambient thought.
pub const AMBIENT_THOUGHT_CHANCE: f32 = 0.02;

/// Radius inside which neighbours push each other apart.
pub const SEPARATION_RADIUS: f32 = 2.0;
/// Weight of the separation push relative to the goal direction.
pub const SEPARATION_WEIGHT: f32 = 0.8;
/// Per-tick heading interpolation factor at zero awareness.
pub const TURN_RATE: f32 = 0.08;
/// Extra turn rate gained at full awareness.
pub const AWARENESS_TURN_BONUS: f32 = 0.02;
/// Maximum per-tick heading jitter while idle, in radians.
pub const IDLE_JITTER: f32 = 0.06;
/// Per-tick interpolation factor for the visual yaw.
pub const YAW_RATE: f32 = 0.15;
/// Interpolation factor pulling out-of-bounds headings towards the origin.
pub const BOUNDARY_TURN: f32 = 0.12;
/// Base walking speed in units per second.
pub const BASE_SPEED: f32 = 1.4;
/// Spread of per-human speed around [`BASE_SPEED`].
pub const SPEED_JITTER: f32 = 0.4;
/// Speed multiplier while observing.
pub const OBSERVE_SPEED_FACTOR: f32 = 0.25;

/// Seconds between pushes from the external thought feed.
pub const THOUGHT_INTERVAL: f32 = 2.0;

/// Lengths below this are treated as zero when normalising.
pub const DIRECTION_EPSILON: f32 = 1e-6;
