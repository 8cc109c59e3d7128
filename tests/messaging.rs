mod common;

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{Events, EventWriter};
use bevy_ecs::system::{Query, ResMut, RunSystemOnce};
use bevy_ecs::world::World;
use glam::Vec3;
use speculoos::prelude::*;

use redlight::audio::AudioEvent;
use redlight::session::{SessionContext, SessionEvent, SessionPhase};
use redlight::systems::messaging::{deliver, Message, RunnerData, RunnerFilter};
use redlight::systems::{Doll, PlayerControlled, PlayerState};

fn messaging_world() -> World {
    let mut world = World::default();
    world.insert_resource(SessionContext::default());
    world.init_resource::<Events<AudioEvent>>();
    world.init_resource::<Events<SessionEvent>>();
    world
}

/// Runs one delivery against the live runner population.
fn send_hit(world: &mut World, sender: Entity, receiver: Entity) {
    world
        .run_system_once(
            move |mut runners: Query<RunnerData, RunnerFilter>,
                  mut session: ResMut<SessionContext>,
                  mut audio: EventWriter<AudioEvent>,
                  mut session_events: EventWriter<SessionEvent>| {
                deliver(
                    &Message::hit(sender, receiver),
                    &mut runners,
                    &mut *session,
                    &mut audio,
                    &mut session_events,
                );
            },
        )
        .unwrap();
}

fn gunfire_cues(world: &World) -> usize {
    world.resource::<Events<AudioEvent>>().len()
}

#[test]
fn a_hit_kills_an_ai_runner_without_ending_the_session() {
    let mut world = messaging_world();
    let runner = common::spawn_runner(&mut world, "victim", Vec3::new(0.0, 0.0, 30.0));
    common::force_state(&mut world, runner, PlayerState::Run);

    send_hit(&mut world, runner, runner);

    assert_that(&common::state_of(&mut world, runner)).is_equal_to(Some(PlayerState::Dead));
    assert_that(&gunfire_cues(&world)).is_equal_to(1);
    assert_that(&world.resource::<SessionContext>().phase).is_equal_to(SessionPhase::Pending);
}

#[test]
fn a_hit_on_the_human_ends_the_session() {
    let mut world = messaging_world();
    let runner = common::spawn_runner(&mut world, "player", Vec3::new(0.0, 0.0, 30.0));
    world.entity_mut(runner).insert(PlayerControlled);
    common::force_state(&mut world, runner, PlayerState::Walk);

    send_hit(&mut world, runner, runner);

    assert_that(&common::state_of(&mut world, runner)).is_equal_to(Some(PlayerState::Dead));
    assert_that(&world.resource::<SessionContext>().phase).is_equal_to(SessionPhase::Ended);
}

#[test]
fn a_hit_addressed_outside_the_runner_population_is_dropped() {
    let mut world = messaging_world();
    let runner = common::spawn_runner(&mut world, "bystander", Vec3::new(0.0, 0.0, 30.0));
    let doll = world.spawn(Doll).id();

    send_hit(&mut world, doll, doll);

    // Nothing mutated, no cue fired, session untouched.
    assert_that(&common::state_of(&mut world, runner)).is_equal_to(Some(PlayerState::Idle));
    assert_that(&gunfire_cues(&world)).is_equal_to(0);
    assert_that(&world.resource::<SessionContext>().phase).is_equal_to(SessionPhase::Pending);
}

#[test]
fn a_hit_addressed_to_a_despawned_entity_is_dropped() {
    let mut world = messaging_world();
    let survivor = common::spawn_runner(&mut world, "survivor", Vec3::new(2.0, 0.0, 30.0));
    let ghost = common::spawn_runner(&mut world, "gone", Vec3::new(-2.0, 0.0, 30.0));
    world.despawn(ghost);

    send_hit(&mut world, survivor, ghost);

    assert_that(&common::state_of(&mut world, survivor)).is_equal_to(Some(PlayerState::Idle));
    assert_that(&gunfire_cues(&world)).is_equal_to(0);
}
