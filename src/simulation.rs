//! The simulation context and its per-tick driver.
//!
//! [`Simulation`] exclusively owns every human, the player proxy, the clock,
//! the void flag and the random source. One call to [`Simulation::step`]
//! runs a whole tick: external beliefs are applied, each human is processed
//! serially (perceive, remember, decide, steer, check arrival), then the
//! boundary is checked and a [`Frame`] is returned for the renderer.

use glam::Vec3;
use hashbrown::HashMap;
use log::{trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::beliefs;
use crate::boundary::{check_boundaries, BoundaryReport, VoidFlag};
use crate::config::{ConfigError, SimConfig};
use crate::constants::BODY_HEIGHT;
use crate::decision::{check_arrival, decide, update_mind};
use crate::entity::{EntityId, Human, Player, Subject};
use crate::events::{BeliefEvent, BeliefOrigin, EventSink};
use crate::goal::GoalTarget;
use crate::inbox::BeliefInbox;
use crate::perception::{perceive, Perception};
use crate::rng::RandomSource;
use crate::snapshot::{EntityView, Frame};
use crate::steering::{advance, blend_separation, crowd_separation, desired_heading};

/// Errors raised while assembling a simulation.
#[derive(Debug, Error)]
pub enum PopulationError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Two humans share an id.
    #[error("duplicate human id {0}")]
    DuplicateId(EntityId),
    /// No humans were supplied.
    #[error("a simulation needs at least one human")]
    Empty,
    /// The requested population does not fit the id space.
    #[error("population {0} exceeds the id space")]
    TooLarge(usize),
}

/// Simulation context passed through every update.
#[derive(Debug, Clone)]
pub struct Simulation<R = StdRng> {
    config: SimConfig,
    humans: Vec<Human>,
    index: HashMap<EntityId, usize>,
    player: Player,
    clock: f32,
    ticks: u64,
    void: VoidFlag,
    rng: R,
}

impl Simulation<StdRng> {
    /// Spawns the configured population using a seeded [`StdRng`].
    ///
    /// # Errors
    /// See [`Simulation::new`].
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use wanderers::{NullSink, SimConfig, Simulation};
    ///
    /// let mut sim = Simulation::seeded(SimConfig::default(), 42).unwrap();
    /// let frame = sim.step(1.0 / 60.0, Vec3::new(0.0, 2.5, 8.0), &mut NullSink);
    /// assert_eq!(frame.entities.len(), 20);
    /// ```
    pub fn seeded(config: SimConfig, seed: u64) -> Result<Self, PopulationError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Spawns `config.population` humans scattered around the origin.
    ///
    /// # Errors
    /// Returns [`PopulationError::Config`] when the configuration is invalid
    /// and [`PopulationError::TooLarge`] when ids would overflow.
    pub fn new(config: SimConfig, mut rng: R) -> Result<Self, PopulationError> {
        config.validate()?;
        let spread = config.world_radius * config.spawn_spread;
        let jitter = config.steering.speed_jitter;
        let humans = (0..config.population)
            .map(|i| {
                let id = u32::try_from(i).map_err(|_| PopulationError::TooLarge(config.population))?;
                let position = Vec3::new(
                    rng.range(-0.5, 0.5) * spread,
                    BODY_HEIGHT,
                    rng.range(-0.5, 0.5) * spread,
                );
                let heading = Vec3::new(rng.range(-0.5, 0.5), 0.0, rng.range(-0.5, 0.5));
                let speed = config.steering.base_speed + rng.range(-jitter, jitter);
                let first_expiry = rng.range(0.0, 2.0);
                Ok(Human::new(EntityId(id), position, heading, speed, first_expiry)
                    .with_free_will(rng.unit()))
            })
            .collect::<Result<Vec<_>, PopulationError>>()?;
        Self::from_humans(config, rng, humans)
    }

    /// Builds a simulation around an explicit crowd.
    ///
    /// # Errors
    /// Returns [`PopulationError::Config`] for an invalid configuration,
    /// [`PopulationError::Empty`] for an empty crowd and
    /// [`PopulationError::DuplicateId`] when ids collide.
    pub fn from_humans(config: SimConfig, rng: R, humans: Vec<Human>) -> Result<Self, PopulationError> {
        config.validate()?;
        if humans.is_empty() {
            return Err(PopulationError::Empty);
        }
        let mut index = HashMap::with_capacity(humans.len());
        for (slot, human) in humans.iter().enumerate() {
            if index.insert(human.id, slot).is_some() {
                return Err(PopulationError::DuplicateId(human.id));
            }
        }
        Ok(Self {
            config,
            humans,
            index,
            player: Player::default(),
            clock: 0.0,
            ticks: 0,
            void: VoidFlag::default(),
            rng,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Every human in creation order.
    #[must_use]
    pub fn humans(&self) -> &[Human] {
        &self.humans
    }

    /// Looks up a human by id.
    #[must_use]
    pub fn human(&self, id: EntityId) -> Option<&Human> {
        self.index.get(&id).and_then(|&slot| self.humans.get(slot))
    }

    /// Mutable access for drivers that place or reconfigure a human between
    /// ticks.
    pub fn human_mut(&mut self, id: EntityId) -> Option<&mut Human> {
        let slot = *self.index.get(&id)?;
        self.humans.get_mut(slot)
    }

    /// Ids of every human in creation order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.humans.iter().map(|human| human.id)
    }

    /// The player proxy as of the last tick.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Simulation clock in seconds.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.clock
    }

    /// Number of completed ticks.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the void display mode is on.
    #[must_use]
    pub const fn void_mode(&self) -> bool {
        self.void.is_active()
    }

    /// The random source, e.g. for drivers sharing it with a thought feed.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Runs the boundary check on the current state without ticking.
    pub fn check_boundaries(&mut self) -> BoundaryReport {
        check_boundaries(
            &mut self.void,
            &self.player,
            &mut self.humans,
            self.config.world_radius,
            self.config.steering.boundary_turn,
        )
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.ticks,
            time: self.clock,
            void_mode: self.void.is_active(),
            entities: self.humans.iter().map(EntityView::from).collect(),
        }
    }

    /// Advances the simulation by one tick with no external beliefs.
    ///
    /// See [`Simulation::step_with_inbox`].
    pub fn step<S>(&mut self, dt: f32, player_position: Vec3, sink: &mut S) -> Frame
    where
        S: EventSink + ?Sized,
    {
        let mut inbox = BeliefInbox::default();
        self.step_with_inbox(dt, player_position, &mut inbox, sink)
    }

    /// Advances the simulation by one tick.
    ///
    /// `dt` is clamped to `[0, config.max_delta]`; non-finite values count as
    /// zero. Queued external beliefs are applied before any human moves.
    pub fn step_with_inbox<S>(
        &mut self,
        dt: f32,
        player_position: Vec3,
        inbox: &mut BeliefInbox,
        sink: &mut S,
    ) -> Frame
    where
        S: EventSink + ?Sized,
    {
        let delta = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_delta)
        } else {
            0.0
        };
        self.clock += delta;
        self.ticks += 1;
        if player_position.is_finite() {
            self.player.position = player_position;
        }

        self.apply_external_beliefs(inbox, sink);
        for slot in 0..self.humans.len() {
            self.update_human(slot, delta, sink);
        }
        self.check_boundaries();
        self.frame()
    }

    fn apply_external_beliefs<S>(&mut self, inbox: &mut BeliefInbox, sink: &mut S)
    where
        S: EventSink + ?Sized,
    {
        for update in inbox.drain() {
            let Some(human) = self
                .index
                .get(&update.entity)
                .and_then(|&slot| self.humans.get_mut(slot))
            else {
                warn!("external belief for unknown {}", update.entity);
                continue;
            };
            human.belief.clone_from(&update.text);
            human.externally_voiced = true;
            sink.belief_changed(&BeliefEvent::new(
                human.id,
                human.position,
                update.text,
                BeliefOrigin::External,
            ));
        }
    }

    fn resolve(&self, target: GoalTarget) -> Option<Vec3> {
        match target {
            GoalTarget::Point(point) => Some(point),
            GoalTarget::Subject(Subject::Player) => Some(self.player.position),
            GoalTarget::Subject(Subject::Human(id)) => self.human(id).map(|human| human.position),
        }
    }

    fn sense(&self, slot: usize) -> Option<(Perception, Vec3)> {
        let observer = self.humans.get(slot)?;
        let perception = perceive(
            observer,
            &self.humans,
            &self.player,
            &self.config.perception,
            self.config.world_radius,
        );
        let separation =
            crowd_separation(observer, &self.humans, self.config.steering.separation_radius);
        Some((perception, separation))
    }

    fn think<S>(&mut self, slot: usize, perception: &Perception, dt: f32, sink: &mut S)
    where
        S: EventSink + ?Sized,
    {
        let now = self.clock;
        let config = &self.config;
        let Some(human) = self.humans.get_mut(slot) else {
            return;
        };

        for sighting in &perception.sightings {
            human.memory.record(now, sighting.subject, sighting.position);
        }
        human.memory.prune(now, config.memory_window);
        update_mind(human, perception, dt, config);

        if let Some(transition) = decide(human, perception, now, config, &mut self.rng) {
            sink.belief_changed(&BeliefEvent::new(
                human.id,
                human.position,
                transition.belief,
                BeliefOrigin::Goal(transition.cause),
            ));
        } else if !human.externally_voiced && self.rng.chance(config.odds.ambient_thought) {
            let thought = beliefs::ambient(perception, &mut self.rng);
            human.belief.clone_from(&thought);
            sink.belief_changed(&BeliefEvent::new(
                human.id,
                human.position,
                thought,
                BeliefOrigin::Ambient,
            ));
        }
    }

    fn update_human<S>(&mut self, slot: usize, dt: f32, sink: &mut S)
    where
        S: EventSink + ?Sized,
    {
        let Some((perception, separation)) = self.sense(slot) else {
            return;
        };
        trace!(
            "slot {slot}: {} sighting(s), edge {}",
            perception.sightings.len(),
            perception.sees_edge
        );
        self.think(slot, &perception, dt, sink);

        let target = self
            .humans
            .get(slot)
            .and_then(|human| human.goal.intent.target())
            .and_then(|goal_target| self.resolve(goal_target));

        let now = self.clock;
        let config = &self.config;
        let Some(human) = self.humans.get_mut(slot) else {
            return;
        };
        let wanted = desired_heading(human, target, &config.steering, &mut self.rng);
        let steered = blend_separation(wanted, separation, config.steering.separation_weight);
        advance(human, steered, dt, &config.steering);

        if let Some(belief) = check_arrival(human, target, now, config, &mut self.rng) {
            sink.belief_changed(&BeliefEvent::new(
                human.id,
                human.position,
                belief,
                BeliefOrigin::Arrival,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MockEventSink, NullSink};
    use crate::goal::Goal;
    use crate::rng::SequenceRandom;
    use rstest::{fixture, rstest};
    use static_assertions::assert_impl_all;

    assert_impl_all!(Simulation: Send, Sync, Clone);

    #[fixture]
    fn quiet() -> SimConfig {
        let mut config = SimConfig::default();
        config.odds.reconsider = 0.0;
        config.odds.ambient_thought = 0.0;
        config.odds.observe_player = 0.0;
        config.odds.approach = 0.0;
        config.max_delta = 1.0;
        config
    }

    fn lone_wanderer(config: SimConfig) -> Simulation<SequenceRandom> {
        let human = Human::new(EntityId(0), Vec3::ZERO, Vec3::X, 2.0, 0.0)
            .with_goal(Goal::wander(Vec3::new(10.0, 0.0, 0.0), 100.0));
        Simulation::from_humans(config, SequenceRandom::constant(0.5), vec![human])
            .expect("valid simulation")
    }

    #[rstest]
    fn seeded_population_matches_config() {
        let sim = Simulation::seeded(SimConfig::default(), 1).expect("valid config");
        assert_eq!(sim.humans().len(), 20);
        let spread = 30.0 * 0.6 / 2.0;
        assert!(sim
            .humans()
            .iter()
            .all(|h| h.position.x.abs() <= spread && h.position.z.abs() <= spread));
        assert!(sim.humans().iter().all(|h| h.goal.expires <= 2.0));
    }

    #[rstest]
    fn duplicate_ids_are_rejected() {
        let a = Human::new(EntityId(1), Vec3::ZERO, Vec3::X, 1.0, 1.0);
        let b = a.clone();
        let result = Simulation::from_humans(SimConfig::default(), SequenceRandom::default(), vec![a, b]);
        assert!(matches!(result, Err(PopulationError::DuplicateId(EntityId(1)))));
    }

    #[rstest]
    fn empty_crowd_is_rejected() {
        let result = Simulation::from_humans(SimConfig::default(), SequenceRandom::default(), vec![]);
        assert!(matches!(result, Err(PopulationError::Empty)));
    }

    #[rstest]
    fn frame_delta_is_clamped() {
        let mut sim = Simulation::seeded(SimConfig::default(), 3).expect("valid config");
        sim.step(5.0, Vec3::new(0.0, 2.5, 8.0), &mut NullSink);
        assert!((sim.time() - 0.1).abs() < 1e-6);
        sim.step(f32::NAN, Vec3::new(0.0, 2.5, 8.0), &mut NullSink);
        sim.step(-1.0, Vec3::new(0.0, 2.5, 8.0), &mut NullSink);
        assert!((sim.time() - 0.1).abs() < 1e-6);
        assert_eq!(sim.ticks(), 3);
    }

    #[rstest]
    fn wanderer_walks_towards_target(quiet: SimConfig) {
        let mut sim = lone_wanderer(quiet);
        let frame = sim.step(1.0, Vec3::new(0.0, 2.5, -20.0), &mut NullSink);
        let view = frame.entities.first().expect("one human");
        assert!((view.position[0] - 2.0).abs() < 1e-4);
    }

    #[rstest]
    fn external_belief_overrides_text(quiet: SimConfig) {
        let mut sim = lone_wanderer(quiet);
        let mut inbox = BeliefInbox::default();
        inbox.push(EntityId(0), "I think I am human.");
        inbox.push(EntityId(99), "nobody home");
        let mut sink = MockEventSink::new();
        sink.expect_belief_changed()
            .withf(|event| event.origin == BeliefOrigin::External && event.entity == EntityId(0))
            .times(1)
            .return_const(());
        sim.step_with_inbox(0.1, Vec3::new(0.0, 2.5, -20.0), &mut inbox, &mut sink);
        let human = sim.human(EntityId(0)).expect("present");
        assert_eq!(human.belief, "I think I am human.");
        assert!(human.externally_voiced);
        assert!(inbox.is_empty());
    }

    #[rstest]
    fn arrival_expires_goal_and_speaks(quiet: SimConfig) {
        let human = Human::new(EntityId(0), Vec3::ZERO, Vec3::X, 1.0, 0.0)
            .with_goal(Goal::wander(Vec3::new(1.0, 0.0, 0.0), 100.0));
        let mut sim = Simulation::from_humans(quiet, SequenceRandom::constant(0.0), vec![human])
            .expect("valid simulation");
        let mut events: Vec<BeliefEvent> = Vec::new();
        sim.step(0.1, Vec3::new(0.0, 2.5, -20.0), &mut events);
        assert!(events.iter().any(|e| e.origin == BeliefOrigin::Arrival));
        let human = sim.human(EntityId(0)).expect("present");
        assert!(human.goal.is_expired(sim.time()));
    }
}
