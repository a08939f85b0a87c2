//! Belief notifications delivered to an injected sink.

use glam::Vec3;
use mockall::predicate::function;
use rstest::rstest;
use test_utils::{quiet_config, scripted, wanderer, FAR_PLAYER};
use wanderers::{BeliefEvent, BeliefInbox, BeliefOrigin, EntityId, EventSink};

mockall::mock! {
    Sink {}
    impl EventSink for Sink {
        fn belief_changed(&mut self, event: &BeliefEvent);
    }
}

fn origin_is(origin: BeliefOrigin) -> impl Fn(&BeliefEvent) -> bool {
    move |event| event.origin == origin
}

#[rstest]
fn arrival_is_reported_once() {
    let human = wanderer(0, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1.0, 100.0);
    let mut sim = scripted(quiet_config(), vec![human], 0.0);
    let mut sink = MockSink::new();
    sink.expect_belief_changed()
        .with(function(origin_is(BeliefOrigin::Arrival)))
        .times(1)
        .return_const(());

    sim.step(0.1, FAR_PLAYER, &mut sink);

    let human = sim.human(EntityId(0)).expect("human exists");
    assert_ne!(human.belief, "I exist.");
}

#[rstest]
fn ambient_thought_fires_when_nothing_else_happens() {
    let mut config = quiet_config();
    config.odds.ambient_thought = 1.0;
    let human = wanderer(0, Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0), 1.0, 100.0);
    let mut sim = scripted(config, vec![human], 0.0);
    let mut sink = MockSink::new();
    sink.expect_belief_changed()
        .with(function(origin_is(BeliefOrigin::Ambient)))
        .times(1)
        .return_const(());

    sim.step(0.1, FAR_PLAYER, &mut sink);
}

#[rstest]
fn external_voice_silences_ambient_thoughts() {
    let mut config = quiet_config();
    config.odds.ambient_thought = 1.0;
    let human = wanderer(0, Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0), 1.0, 100.0);
    let mut sim = scripted(config, vec![human], 0.0);
    let mut inbox = BeliefInbox::default();
    inbox.push(EntityId(0), "Is someone watching me?");

    let mut sink = MockSink::new();
    sink.expect_belief_changed()
        .with(function(origin_is(BeliefOrigin::External)))
        .times(1)
        .return_const(());
    sim.step_with_inbox(0.1, FAR_PLAYER, &mut inbox, &mut sink);
    sim.step_with_inbox(0.1, FAR_PLAYER, &mut inbox, &mut sink);

    let human = sim.human(EntityId(0)).expect("human exists");
    assert_eq!(human.belief, "Is someone watching me?");
}
