//! Runtime configuration for the simulation.
//!
//! [`SimConfig`] groups every tunable the per-tick logic reads. All fields
//! default to the values in [`crate::constants`], and JSON documents may
//! override any subset of them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AMBIENT_THOUGHT_CHANCE, APPROACH_CHANCE, ARRIVAL_DISTANCE, AWARENESS_TURN_BONUS, BASE_SPEED,
    BODY_RADIUS, BOUNDARY_TURN, FOV_HALF_ANGLE, HUMAN_COUNT, IDLE_JITTER, MAX_FRAME_DELTA,
    MEMORY_WINDOW, OBSERVE_PLAYER_CHANCE, OBSERVE_SPEED_FACTOR, PLAYER_RADIUS, RECONSIDER_CHANCE,
    SEPARATION_RADIUS, SEPARATION_WEIGHT, SPAWN_SPREAD, SPEED_JITTER, THOUGHT_INTERVAL,
    TURN_RATE, VIEW_RANGE, WANDER_RADIUS, WORLD_RADIUS, YAW_RATE,
};

/// Errors raised while loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON for [`SimConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Inclusive range of goal lifetimes in simulation seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    /// Shortest lifetime.
    pub min: f32,
    /// Longest lifetime.
    pub max: f32,
}

impl DurationRange {
    /// Creates a range spanning `min..=max`.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn check(self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 {
            return Err(invalid(field, "bounds must be finite and non-negative"));
        }
        if self.min > self.max {
            return Err(invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Vision cone and body sizes used by the spatial query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Half-angle of the forward cone in radians.
    pub fov_half_angle: f32,
    /// Maximum distance at which anything is seen.
    pub view_range: f32,
    /// Occlusion sphere radius of a human.
    pub body_radius: f32,
    /// Occlusion sphere radius of the player proxy.
    pub player_radius: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            fov_half_angle: FOV_HALF_ANGLE,
            view_range: VIEW_RANGE,
            body_radius: BODY_RADIUS,
            player_radius: PLAYER_RADIUS,
        }
    }
}

/// Goal lifetimes and distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    /// Radius around the current position for wander targets.
    pub wander_radius: f32,
    /// Distance below which a targeted goal is reached.
    pub arrival_distance: f32,
    /// Lifetime of `Wander` goals.
    pub wander: DurationRange,
    /// Lifetime of `Approach` goals.
    pub approach: DurationRange,
    /// Lifetime of `Observe` goals.
    pub observe: DurationRange,
    /// Lifetime of `ExploreMemory` goals.
    pub explore: DurationRange,
    /// Lifetime of `Idle` goals.
    pub idle: DurationRange,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            wander_radius: WANDER_RADIUS,
            arrival_distance: ARRIVAL_DISTANCE,
            wander: DurationRange::new(4.0, 10.0),
            approach: DurationRange::new(2.0, 6.0),
            observe: DurationRange::new(3.0, 7.0),
            explore: DurationRange::new(3.0, 8.0),
            idle: DurationRange::new(2.0, 6.0),
        }
    }
}

/// Probabilities driving the goal state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Odds {
    /// Chance (times free will) of turning to observe a visible player.
    pub observe_player: f32,
    /// Chance of approaching a visible human while wandering.
    pub approach: f32,
    /// Chance (times free will) of dropping an unexpired goal.
    pub reconsider: f32,
    /// Per-tick chance of an ambient thought.
    pub ambient_thought: f32,
    /// Share of reselections that pick `Wander`.
    pub wander_share: f32,
    /// Share of the remaining reselections that explore a memory.
    pub explore_share: f32,
}

impl Default for Odds {
    fn default() -> Self {
        Self {
            observe_player: OBSERVE_PLAYER_CHANCE,
            approach: APPROACH_CHANCE,
            reconsider: RECONSIDER_CHANCE,
            ambient_thought: AMBIENT_THOUGHT_CHANCE,
            wander_share: 0.5,
            explore_share: 0.5,
        }
    }
}

/// Steering, separation and speed parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Neighbours closer than this push each other apart.
    pub separation_radius: f32,
    /// Blend weight of the separation push.
    pub separation_weight: f32,
    /// Heading interpolation factor per tick.
    pub turn_rate: f32,
    /// Additional interpolation at full awareness.
    pub awareness_turn_bonus: f32,
    /// Maximum idle rotation per tick in radians.
    pub idle_jitter: f32,
    /// Visual yaw interpolation factor per tick.
    pub yaw_rate: f32,
    /// Pull towards the origin applied to out-of-bounds humans.
    pub boundary_turn: f32,
    /// Mean walking speed.
    pub base_speed: f32,
    /// Spread of individual speeds around `base_speed`.
    pub speed_jitter: f32,
    /// Speed multiplier for `Observe` goals.
    pub observe_speed_factor: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            separation_radius: SEPARATION_RADIUS,
            separation_weight: SEPARATION_WEIGHT,
            turn_rate: TURN_RATE,
            awareness_turn_bonus: AWARENESS_TURN_BONUS,
            idle_jitter: IDLE_JITTER,
            yaw_rate: YAW_RATE,
            boundary_turn: BOUNDARY_TURN,
            base_speed: BASE_SPEED,
            speed_jitter: SPEED_JITTER,
            observe_speed_factor: OBSERVE_SPEED_FACTOR,
        }
    }
}

/// Growth and decay rates of the awareness and doubt scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindConfig {
    /// Fraction of the remaining headroom gained per perceiving tick.
    pub awareness_gain: f32,
    /// Fractional loss per second without perception.
    pub awareness_decay: f32,
    /// Fraction of the remaining headroom gained per unsettling tick.
    pub doubt_gain: f32,
    /// Fractional loss per second without unsettling sightings.
    pub doubt_decay: f32,
}

impl Default for MindConfig {
    fn default() -> Self {
        Self {
            awareness_gain: 0.1,
            awareness_decay: 0.05,
            doubt_gain: 0.04,
            doubt_decay: 0.01,
        }
    }
}

/// Complete simulation configuration.
///
/// # Examples
///
/// ```
/// use wanderers::SimConfig;
///
/// let config = SimConfig::from_json_str(r#"{ "population": 5 }"#).unwrap();
/// assert_eq!(config.population, 5);
/// assert!((config.world_radius - 30.0).abs() < f32::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of humans spawned by [`crate::Simulation::new`].
    pub population: usize,
    /// Planar radius past which the void flag trips.
    pub world_radius: f32,
    /// Spawn square side as a fraction of the world radius.
    pub spawn_spread: f32,
    /// Upper clamp for frame deltas.
    pub max_delta: f32,
    /// Seconds a sighting stays in memory.
    pub memory_window: f32,
    /// Seconds between pushes of the external thought feed.
    pub thought_interval: f32,
    /// Spatial query parameters.
    pub perception: PerceptionConfig,
    /// Goal lifetimes and distances.
    pub goals: GoalConfig,
    /// Transition probabilities.
    pub odds: Odds,
    /// Steering parameters.
    pub steering: SteeringConfig,
    /// Awareness and doubt dynamics.
    pub mind: MindConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population: HUMAN_COUNT,
            world_radius: WORLD_RADIUS,
            spawn_spread: SPAWN_SPREAD,
            max_delta: MAX_FRAME_DELTA,
            memory_window: MEMORY_WINDOW,
            thought_interval: THOUGHT_INTERVAL,
            perception: PerceptionConfig::default(),
            goals: GoalConfig::default(),
            odds: Odds::default(),
            steering: SteeringConfig::default(),
            mind: MindConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value fails validation.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the same errors as [`SimConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that every value is usable by the simulation.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(invalid("population", "at least one human is required"));
        }
        positive("world_radius", self.world_radius)?;
        positive("max_delta", self.max_delta)?;
        positive("memory_window", self.memory_window)?;
        positive("thought_interval", self.thought_interval)?;
        unit_interval("spawn_spread", self.spawn_spread)?;

        positive("perception.view_range", self.perception.view_range)?;
        positive("perception.body_radius", self.perception.body_radius)?;
        positive("perception.player_radius", self.perception.player_radius)?;
        if !(0.0..=std::f32::consts::PI).contains(&self.perception.fov_half_angle) {
            return Err(invalid(
                "perception.fov_half_angle",
                "must lie within [0, pi]",
            ));
        }

        positive("goals.wander_radius", self.goals.wander_radius)?;
        positive("goals.arrival_distance", self.goals.arrival_distance)?;
        self.goals.wander.check("goals.wander")?;
        self.goals.approach.check("goals.approach")?;
        self.goals.observe.check("goals.observe")?;
        self.goals.explore.check("goals.explore")?;
        self.goals.idle.check("goals.idle")?;

        unit_interval("odds.observe_player", self.odds.observe_player)?;
        unit_interval("odds.approach", self.odds.approach)?;
        unit_interval("odds.reconsider", self.odds.reconsider)?;
        unit_interval("odds.ambient_thought", self.odds.ambient_thought)?;
        unit_interval("odds.wander_share", self.odds.wander_share)?;
        unit_interval("odds.explore_share", self.odds.explore_share)?;

        positive("steering.separation_radius", self.steering.separation_radius)?;
        positive("steering.base_speed", self.steering.base_speed)?;
        unit_interval("steering.separation_weight", self.steering.separation_weight)?;
        unit_interval("steering.turn_rate", self.steering.turn_rate)?;
        unit_interval(
            "steering.awareness_turn_bonus",
            self.steering.awareness_turn_bonus,
        )?;
        unit_interval("steering.yaw_rate", self.steering.yaw_rate)?;
        unit_interval("steering.boundary_turn", self.steering.boundary_turn)?;
        unit_interval(
            "steering.observe_speed_factor",
            self.steering.observe_speed_factor,
        )?;
        if self.steering.speed_jitter < 0.0 || self.steering.speed_jitter >= self.steering.base_speed
        {
            return Err(invalid(
                "steering.speed_jitter",
                "must be non-negative and below base_speed",
            ));
        }

        unit_interval("mind.awareness_gain", self.mind.awareness_gain)?;
        unit_interval("mind.awareness_decay", self.mind.awareness_decay)?;
        unit_interval("mind.doubt_gain", self.mind.doubt_gain)?;
        unit_interval("mind.doubt_decay", self.mind.doubt_decay)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a positive value, got {value}")))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a value in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[rstest]
    fn partial_document_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "odds": { "approach": 0.5 } }"#)
            .expect("valid document");
        assert!((config.odds.approach - 0.5).abs() < f32::EPSILON);
        assert!((config.odds.observe_player - OBSERVE_PLAYER_CHANCE).abs() < f32::EPSILON);
        assert_eq!(config.goals, GoalConfig::default());
    }

    #[rstest]
    #[case::probability(r#"{ "odds": { "reconsider": 1.5 } }"#, "odds.reconsider")]
    #[case::population(r#"{ "population": 0 }"#, "population")]
    #[case::inverted(r#"{ "goals": { "idle": { "min": 5.0, "max": 1.0 } } }"#, "goals.idle")]
    #[case::clamp(r#"{ "max_delta": 0.0 }"#, "max_delta")]
    fn rejects_invalid_values(#[case] doc: &str, #[case] expected: &str) {
        match SimConfig::from_json_str(doc) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SimConfig::from_json_str("{ population: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[rstest]
    fn missing_file_reports_path() {
        let path = std::env::temp_dir().join("wanderers-does-not-exist.json");
        match SimConfig::from_path(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
