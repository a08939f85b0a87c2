//! Bevy plugin driving the sandbox from the app schedule.
//!
//! The simulation lives in the [`SandboxWorld`] resource. Each `Update` it is
//! stepped with the frame delta and the [`PlayerCamera`] position, then the
//! resulting positions, yaws and beliefs are copied onto the spawned
//! entities. Rendering is left to whoever owns the app.

use bevy_app::{App, Plugin, Startup, Update};
use bevy_ecs::prelude::*;
use bevy_time::{Time, TimePlugin};
use bevy_transform::components::Transform;
use glam::Quat;
use log::{debug, error};
use thiserror::Error;

use crate::config::SimConfig;
use crate::entity::{EntityId, Human};
use crate::events::LogSink;
use crate::inbox::BeliefInbox;
use crate::simulation::Simulation;
use crate::thought_feed::ThoughtFeed;

/// Event raised when the sandbox cannot start.
#[derive(Event, Debug, Clone, Error)]
#[error("sandbox setup failed: {detail}")]
pub struct SandboxError {
    /// Description of the underlying error.
    pub detail: String,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_sandbox_error(event: On<SandboxError>) {
    error!("{}", event.event());
}

/// The simulation plus its external belief plumbing.
#[derive(Resource, Debug)]
pub struct SandboxWorld {
    /// The simulation context.
    pub simulation: Simulation,
    /// Pending external beliefs, drained every tick.
    pub inbox: BeliefInbox,
    /// Optional periodic thought source feeding `inbox`.
    pub feed: Option<ThoughtFeed>,
}

/// Mirrors the one-way void flag for render systems.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VoidMode(pub bool);

/// Links an ECS entity to a simulated human.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HumanId(pub EntityId);

/// Floating text shown above a human.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct BeliefLabel(pub String);

/// Marks the entity whose transform stands in for the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerCamera;

/// Installs the sandbox resources and systems.
#[derive(Debug, Clone)]
pub struct SandboxPlugin {
    /// Simulation parameters.
    pub config: SimConfig,
    /// Seed for the simulation's random source.
    pub seed: u64,
    /// Whether to run the periodic external thought feed.
    pub external_thoughts: bool,
}

impl Default for SandboxPlugin {
    fn default() -> Self {
        Self {
            config: SimConfig::default(),
            seed: 0,
            external_thoughts: true,
        }
    }
}

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_sandbox_error);

        let simulation = match Simulation::seeded(self.config.clone(), self.seed) {
            Ok(simulation) => simulation,
            Err(e) => {
                app.world_mut().trigger(SandboxError {
                    detail: e.to_string(),
                });
                return;
            }
        };
        let feed = self
            .external_thoughts
            .then(|| ThoughtFeed::new(simulation.config().thought_interval));

        app.insert_resource(SandboxWorld {
            simulation,
            inbox: BeliefInbox::default(),
            feed,
        });
        app.init_resource::<VoidMode>();
        if !app.is_plugin_added::<TimePlugin>() {
            app.add_plugins(TimePlugin);
        }
        app.add_systems(Startup, spawn_humans_system);
        app.add_systems(Update, (tick_sandbox_system, sync_humans_system).chain());
    }
}

fn transform_for(human: &Human) -> Transform {
    Transform::from_translation(human.position).with_rotation(Quat::from_rotation_y(human.yaw))
}

/// Spawns one entity per simulated human.
pub fn spawn_humans_system(mut commands: Commands, world: Res<SandboxWorld>) {
    for human in world.simulation.humans() {
        commands.spawn((
            HumanId(human.id),
            BeliefLabel(human.belief.clone()),
            transform_for(human),
        ));
    }
    debug!("spawned {} human(s)", world.simulation.humans().len());
}

/// Advances the simulation by the frame delta.
pub fn tick_sandbox_system(
    time: Res<Time>,
    mut world: ResMut<SandboxWorld>,
    mut void: ResMut<VoidMode>,
    camera: Query<&Transform, With<PlayerCamera>>,
) {
    let dt = time.delta_secs();
    let SandboxWorld {
        simulation,
        inbox,
        feed,
    } = &mut *world;

    let player = camera
        .single()
        .map_or(simulation.player().position, |transform| transform.translation);

    if let Some(source) = feed {
        let ids: Vec<EntityId> = simulation.ids().collect();
        source.poll(dt, ids, simulation.rng_mut(), inbox);
    }
    simulation.step_with_inbox(dt, player, inbox, &mut LogSink);
    void.set_if_neq(VoidMode(simulation.void_mode()));
}

/// Copies positions, yaws and beliefs onto the spawned entities.
pub fn sync_humans_system(
    world: Res<SandboxWorld>,
    mut humans: Query<(&HumanId, &mut Transform, &mut BeliefLabel)>,
) {
    for (id, mut transform, mut label) in &mut humans {
        let Some(human) = world.simulation.human(id.0) else {
            continue;
        };
        *transform = transform_for(human);
        if label.0 != human.belief {
            label.0.clone_from(&human.belief);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_time::TimeUpdateStrategy;
    use glam::Vec3;
    use rstest::rstest;
    use std::time::Duration;

    fn app_with(plugin: SandboxPlugin) -> App {
        let mut app = App::new();
        app.add_plugins(plugin);
        app
    }

    #[rstest]
    fn plugin_spawns_population() {
        let mut app = app_with(SandboxPlugin::default());
        assert!(app.world().contains_resource::<SandboxWorld>());
        app.update();

        let world = app.world_mut();
        let mut query = world.query::<&HumanId>();
        assert_eq!(query.iter(world).count(), 20);
        assert_eq!(world.resource::<SandboxWorld>().simulation.ticks(), 1);
    }

    fn tick_every(app: &mut App, step: Duration) {
        app.insert_resource(TimeUpdateStrategy::ManualDuration(step));
    }

    fn human_rows(app: &mut App) -> Vec<(EntityId, Vec3, String)> {
        let world = app.world_mut();
        let mut query = world.query::<(&HumanId, &Transform, &BeliefLabel)>();
        query
            .iter(world)
            .map(|(id, transform, label)| (id.0, transform.translation, label.0.clone()))
            .collect()
    }

    #[rstest]
    fn transforms_follow_simulation() {
        let mut app = app_with(SandboxPlugin {
            seed: 9,
            ..SandboxPlugin::default()
        });
        tick_every(&mut app, Duration::from_millis(100));
        app.update();
        let start = human_rows(&mut app);

        for _ in 0..40 {
            app.update();
        }

        let rows = human_rows(&mut app);
        let sandbox = app.world().resource::<SandboxWorld>();
        assert!(sandbox.simulation.time() > 2.0);
        for (id, translation, belief) in &rows {
            let human = sandbox.simulation.human(*id).expect("human exists");
            assert_eq!(*translation, human.position);
            assert_eq!(*belief, human.belief);
        }
        let moved = rows
            .iter()
            .filter(|(id, translation, _)| {
                start
                    .iter()
                    .any(|(other, before, _)| other == id && before != translation)
            })
            .count();
        assert!(moved > 0, "no human moved while time advanced");
    }

    #[rstest]
    fn memory_is_pruned_as_time_passes() {
        let mut app = app_with(SandboxPlugin::default());
        tick_every(&mut app, Duration::from_millis(100));
        for _ in 0..120 {
            app.update();
        }
        let sandbox = app.world().resource::<SandboxWorld>();
        let now = sandbox.simulation.time();
        let window = sandbox.simulation.config().memory_window;
        assert!(now > window);
        assert!(sandbox
            .simulation
            .humans()
            .iter()
            .flat_map(|human| human.memory.entries())
            .all(|entry| now - entry.time <= window));
    }

    #[rstest]
    fn invalid_config_skips_setup() {
        let mut config = SimConfig::default();
        config.population = 0;
        let app = app_with(SandboxPlugin {
            config,
            ..SandboxPlugin::default()
        });
        assert!(!app.world().contains_resource::<SandboxWorld>());
    }

    #[rstest]
    fn player_camera_drives_player_proxy() {
        let mut app = app_with(SandboxPlugin::default());
        app.world_mut()
            .spawn((PlayerCamera, Transform::from_xyz(1.0, 2.5, 3.0)));
        app.update();
        let sandbox = app.world().resource::<SandboxWorld>();
        assert_eq!(sandbox.simulation.player().position, Vec3::new(1.0, 2.5, 3.0));
    }
}
