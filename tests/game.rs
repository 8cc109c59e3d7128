mod common;

use bevy_ecs::query::With;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use redlight::fsm::StateMachine;
use redlight::game::{Game, GameConfig};
use redlight::systems::{Doll, PlayerState, Position, Soldier};

fn seeded(npc_count: usize) -> Game {
    Game::new(GameConfig {
        npc_count,
        seed: Some(17),
    })
    .unwrap()
}

#[test]
fn spawns_the_whole_population() {
    let mut game = seeded(10);

    // The human plus ten AI runners, everyone idling at the start.
    let tally = game.tally();
    assert_eq!(tally.idle, 11);
    assert_eq!(tally.dead + tally.dance + tally.walk + tally.run, 0);

    let mut soldiers = game.world.query::<&Soldier>();
    assert_that(&soldiers.iter(&game.world).count()).is_equal_to(2);
    assert_that(&game.find_by_name("player")).is_some();
    assert_that(&game.find_by_name("doll")).is_some();
}

#[test]
fn ai_runners_spawn_inside_the_start_box() {
    let mut game = seeded(50);
    for index in 0..50 {
        let entity = game.find_by_name(&format!("npc-{index}")).unwrap();
        let position = game.world.get::<Position>(entity).unwrap().0;
        assert_that(&(-14.0..=14.0).contains(&position.x)).is_true();
        assert_that(&(47.0..=50.0).contains(&position.z)).is_true();
    }
}

#[test]
fn soldiers_idle_through_the_whole_session() {
    let mut game = seeded(0);
    game.start().unwrap();
    common::run_seconds(&mut game, 20);

    let mut soldiers = game
        .world
        .query_filtered::<&StateMachine<PlayerState>, With<Soldier>>();
    for machine in soldiers.iter(&game.world) {
        assert_that(&machine.current()).is_equal_to(Some(PlayerState::Idle));
    }
}

#[test]
fn the_doll_is_not_part_of_the_runner_population() {
    let mut game = seeded(0);
    game.start().unwrap();
    // Sit through a red light; the doll itself must never be swept.
    common::run_seconds(&mut game, 6);

    let mut dolls = game
        .world
        .query_filtered::<&StateMachine<redlight::systems::DollState>, With<Doll>>();
    assert_that(&dolls.iter(&game.world).count()).is_equal_to(1);
}

#[test]
fn identical_seeds_replay_identically() {
    let mut left = seeded(30);
    let mut right = seeded(30);
    left.start().unwrap();
    right.start().unwrap();

    for _ in 0..(20 * 60) {
        left.tick(1.0 / 60.0);
        right.tick(1.0 / 60.0);
    }

    assert_eq!(left.tally(), right.tally());
    assert_eq!(left.session().countdown, right.session().countdown);
}
