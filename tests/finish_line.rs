mod common;

use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use glam::Vec3;
use speculoos::prelude::*;

use redlight::systems::{finish_line_system, Behavior, FinishLine, Npc, PlayerState, Steering, TriggerRegion};

#[test]
fn touch_test_includes_the_bounding_radius() {
    let region = TriggerRegion::new(Vec3::new(0.0, 0.0, -50.0), Vec3::new(50.0, 5.0, 10.0));
    // Half depth is 5; the 0.6 radius stretches contact to 5.6.
    assert_that(&region.touches(Vec3::new(0.0, 0.0, -44.5), 0.6)).is_true();
    assert_that(&region.touches(Vec3::new(0.0, 0.0, -44.0), 0.6)).is_false();
    assert_that(&region.touches(Vec3::new(26.0, 0.0, -50.0), 0.6)).is_false();
}

fn finish_world() -> World {
    let mut world = World::default();
    world.insert_resource(FinishLine::default());
    world
}

#[test]
fn arrival_turns_a_runner_into_a_dancer() {
    let mut world = finish_world();
    let runner = common::spawn_runner(&mut world, "arrival", Vec3::new(0.0, 0.0, -48.0));
    common::force_state(&mut world, runner, PlayerState::Run);

    world.run_system_once(finish_line_system).unwrap();

    assert_that(&common::state_of(&mut world, runner)).is_equal_to(Some(PlayerState::Dance));
    assert_that(&world.resource::<FinishLine>().has_fired(runner)).is_true();
}

#[test]
fn arrival_clears_an_ai_strategy() {
    let mut world = finish_world();
    let runner = common::spawn_runner(&mut world, "arrival", Vec3::new(3.0, 0.0, -48.0));
    world.entity_mut(runner).insert((
        Npc,
        Steering {
            behavior: Behavior::DirectSeek {
                target: Vec3::new(3.0, 0.0, -45.0),
            },
            active: true,
        },
    ));

    world.run_system_once(finish_line_system).unwrap();

    assert_that(&world.get::<Steering>(runner).unwrap().active).is_false();
}

#[test]
fn the_trigger_fires_once_per_runner() {
    let mut world = finish_world();
    let runner = common::spawn_runner(&mut world, "arrival", Vec3::new(0.0, 0.0, -48.0));

    world.run_system_once(finish_line_system).unwrap();
    assert_that(&common::state_of(&mut world, runner)).is_equal_to(Some(PlayerState::Dance));

    // Still overlapping, but already cached.
    common::force_state(&mut world, runner, PlayerState::Idle);
    world.run_system_once(finish_line_system).unwrap();
    assert_that(&common::state_of(&mut world, runner)).is_equal_to(Some(PlayerState::Idle));
}

#[test]
fn runners_short_of_the_line_are_ignored() {
    let mut world = finish_world();
    let runner = common::spawn_runner(&mut world, "short", Vec3::new(0.0, 0.0, -30.0));

    world.run_system_once(finish_line_system).unwrap();

    assert_that(&common::state_of(&mut world, runner)).is_equal_to(Some(PlayerState::Idle));
    assert_that(&world.resource::<FinishLine>().has_fired(runner)).is_false();
}
