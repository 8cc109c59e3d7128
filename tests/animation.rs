use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use redlight::animation::{animation_system, AnimationSet, Clip, LoopMode};
use redlight::constants::clip;
use redlight::error::{AnimationError, GameError};
use redlight::systems::{DeltaTime, PlayerState};

fn walk_run_set() -> AnimationSet {
    AnimationSet::new([
        (PlayerState::Walk, Clip::new(clip::WALK)),
        (PlayerState::Run, Clip::new(clip::RUN)),
    ])
}

#[test]
fn validate_rejects_a_missing_clip() {
    let set = walk_run_set();
    let result = set.validate(&[PlayerState::Walk, PlayerState::Dead]);
    assert!(matches!(result, Err(GameError::Animation(AnimationError::MissingClip(_)))));
}

#[test]
fn synced_fade_scales_playback_time_by_clip_ratio() {
    let mut set = walk_run_set();
    set.clip_mut(PlayerState::Walk).unwrap().time = 0.6;

    set.cross_fade(PlayerState::Walk, PlayerState::Run, 0.5, true).unwrap();

    // 0.6 into a 1.2s walk is halfway; halfway into a 0.8s run is 0.4.
    let run = set.clip(PlayerState::Run).unwrap();
    assert_that(&run.enabled).is_true();
    assert_that(&(run.time - 0.4).abs()).is_less_than(1e-6);
    assert_eq!(run.last_fade.unwrap().duration, 0.5);
}

#[test]
fn unsynced_fade_restarts_the_target_clip() {
    let mut set = walk_run_set();
    {
        let run = set.clip_mut(PlayerState::Run).unwrap();
        run.time = 0.3;
        run.time_scale = 0.7;
        run.weight = 0.2;
    }

    set.cross_fade(PlayerState::Walk, PlayerState::Run, 0.5, false).unwrap();

    let run = set.clip(PlayerState::Run).unwrap();
    assert_that(&run.time).is_equal_to(0.0);
    assert_that(&run.time_scale).is_equal_to(1.0);
    assert_that(&run.weight).is_equal_to(1.0);
}

fn animation_world(set: AnimationSet) -> World {
    let mut world = World::default();
    world.insert_resource(DeltaTime { seconds: 0.5 });
    world.spawn(set);
    world
}

fn clip_of(world: &mut World, state: PlayerState) -> Clip {
    world
        .query::<&AnimationSet>()
        .single(world)
        .unwrap()
        .clip(state)
        .unwrap()
        .clone()
}

#[test]
fn repeating_clips_wrap_around() {
    let mut set = walk_run_set();
    {
        let walk = set.clip_mut(PlayerState::Walk).unwrap();
        walk.enabled = true;
        walk.time = 1.0;
    }
    let mut world = animation_world(set);

    world.run_system_once(animation_system).unwrap();

    // 1.5 into a 1.2s loop wraps to 0.3.
    let walk = clip_of(&mut world, PlayerState::Walk);
    assert_that(&(walk.time - 0.3).abs()).is_less_than(1e-5);
}

#[test]
fn clamped_one_shot_clips_freeze_on_their_last_frame() {
    let mut set = walk_run_set();
    {
        let run = set.clip_mut(PlayerState::Run).unwrap();
        run.enabled = true;
        run.time = 0.7;
        run.loop_mode = LoopMode::Once;
        run.clamp_when_finished = true;
    }
    let mut world = animation_world(set);

    world.run_system_once(animation_system).unwrap();
    let run = clip_of(&mut world, PlayerState::Run);
    assert_that(&run.time).is_equal_to(clip::RUN);
    assert_that(&run.enabled).is_true();

    // Further updates hold the pose.
    world.run_system_once(animation_system).unwrap();
    let run = clip_of(&mut world, PlayerState::Run);
    assert_that(&run.time).is_equal_to(clip::RUN);
}

#[test]
fn disabled_clips_do_not_advance() {
    let mut world = animation_world(walk_run_set());
    world.run_system_once(animation_system).unwrap();
    let walk = clip_of(&mut world, PlayerState::Walk);
    assert_that(&walk.time).is_equal_to(0.0);
}
