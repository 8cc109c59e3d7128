#![allow(dead_code)]

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use glam::Vec3;
use strum::IntoEnumIterator;

use redlight::animation::{AnimationSet, Clip};
use redlight::constants::clip;
use redlight::fsm::StateMachine;
use redlight::game::Game;
use redlight::systems::{
    InputFlags, InputState, MaxSpeed, Name, Orientation, PlayerCtx, PlayerState, Position, Runner, RunnerBundle,
    Velocity,
};

/// Spawns an AI-free runner at `position`, entered into IDLE.
pub fn spawn_runner(world: &mut World, name: &str, position: Vec3) -> Entity {
    let mut velocity = Velocity::default();
    let mut orientation = Orientation::default();
    let mut animations = AnimationSet::new([
        (PlayerState::Idle, Clip::new(clip::IDLE)),
        (PlayerState::Walk, Clip::new(clip::WALK)),
        (PlayerState::Run, Clip::new(clip::RUN)),
        (PlayerState::Dance, Clip::new(clip::DANCE)),
        (PlayerState::Dead, Clip::new(clip::DEAD)),
    ]);

    let mut machine = StateMachine::new();
    for state in PlayerState::iter() {
        machine.add(state).unwrap();
    }
    let mut ctx = PlayerCtx {
        position,
        velocity: &mut velocity,
        orientation: &mut orientation,
        animations: &mut animations,
        input: InputFlags::empty(),
        controlled: false,
    };
    machine.change_to(PlayerState::Idle, &mut ctx).unwrap();

    world
        .spawn(RunnerBundle {
            runner: Runner,
            name: Name(name.to_string()),
            position: Position(position),
            velocity,
            max_speed: MaxSpeed(4.0),
            orientation,
            machine,
            animations,
        })
        .id()
}

/// Forces a runner into `state` through a regular transition.
pub fn force_state(world: &mut World, entity: Entity, state: PlayerState) {
    let mut query = world.query::<(
        &mut StateMachine<PlayerState>,
        &mut Velocity,
        &mut Orientation,
        &mut AnimationSet,
        &Position,
    )>();
    let (mut machine, mut velocity, mut orientation, mut animations, position) =
        query.get_mut(world, entity).unwrap();
    let mut ctx = PlayerCtx {
        position: position.0,
        velocity: &mut *velocity,
        orientation: &mut *orientation,
        animations: &mut *animations,
        input: InputFlags::empty(),
        controlled: false,
    };
    machine.change_to(state, &mut ctx).unwrap();
}

pub fn state_of(world: &mut World, entity: Entity) -> Option<PlayerState> {
    world
        .query::<&StateMachine<PlayerState>>()
        .get(world, entity)
        .unwrap()
        .current()
}

/// Advances the game by whole simulated seconds, one tick per second.
pub fn run_seconds(game: &mut Game, seconds: u32) {
    for _ in 0..seconds {
        game.tick(1.0);
    }
}

/// Sets the directional input snapshot for the next ticks.
pub fn press(game: &mut Game, flags: InputFlags) {
    game.world.resource_mut::<InputState>().flags = flags;
}
