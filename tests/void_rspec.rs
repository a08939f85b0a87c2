//! Behaviour tests for the one-way void flag using rust-rspec.

use glam::Vec3;
use test_utils::{human_at, quiet_config, scripted};
use wanderers::rng::SequenceRandom;
use wanderers::{EntityId, NullSink, Simulation, BODY_HEIGHT};

const INSIDE: Vec3 = Vec3::new(0.0, 2.5, 8.0);
const OUTSIDE: Vec3 = Vec3::new(0.0, 2.5, 35.0);

#[derive(Debug, Clone)]
struct Sandbox {
    sim: Simulation<SequenceRandom>,
}

impl Default for Sandbox {
    fn default() -> Self {
        let human = human_at(0, 0.0, 0.0, Vec3::X, 1.0);
        Self {
            sim: scripted(quiet_config(), vec![human], 0.5),
        }
    }
}

impl Sandbox {
    fn tick_with_player_at(&mut self, position: Vec3) {
        self.sim.step(0.1, position, &mut NullSink);
    }

    fn carry_human_to(&mut self, x: f32) {
        let human = self.sim.human_mut(EntityId(0)).expect("human exists");
        human.position = Vec3::new(x, BODY_HEIGHT, 0.0);
        self.tick_with_player_at(INSIDE);
    }
}

#[test]
fn void_mode_never_switches_off() {
    rspec::run(&rspec::given(
        "a crowd with the player standing inside the world",
        Sandbox::default(),
        |ctx| {
            ctx.before_each(|world| world.tick_with_player_at(INSIDE));
            ctx.then("the void is off", |world| {
                assert!(!world.sim.void_mode());
            });

            ctx.when("a human is carried past the world radius", |ctx| {
                ctx.before_each(|world| world.carry_human_to(35.0));
                ctx.then("the void switches on", |world| {
                    assert!(world.sim.void_mode());
                });

                ctx.when("the human is brought back inside", |ctx| {
                    ctx.before_each(|world| {
                        world.carry_human_to(0.0);
                        world.tick_with_player_at(INSIDE);
                    });
                    ctx.then("the human is inside and the void stays on", |world| {
                        let human = world.sim.human(EntityId(0)).expect("human exists");
                        assert!(human.position.x.abs() < 30.0);
                        assert!(world.sim.void_mode());
                    });
                });
            });

            ctx.when("the player steps past the world radius", |ctx| {
                ctx.before_each(|world| world.tick_with_player_at(OUTSIDE));
                ctx.then("the void switches on", |world| {
                    assert!(world.sim.void_mode());
                });

                ctx.when("the player walks back inside", |ctx| {
                    ctx.before_each(|world| {
                        world.tick_with_player_at(INSIDE);
                        world.tick_with_player_at(INSIDE);
                    });
                    ctx.then("the void stays on", |world| {
                        assert!(world.sim.void_mode());
                    });
                });
            });
        },
    ));
}
