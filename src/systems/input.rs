//! Directional input snapshot and third-person control.
//!
//! The page layer refreshes [`InputState`] once per tick for the human
//! runner; this module turns the snapshot into velocity the way the
//! third-person controller does, minus the DOM and camera wiring.

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, Res};
use bitflags::bitflags;
use glam::Vec3;

use crate::constants::{BRAKING_FORCE, RUN_MAX_SPEED, WALK_MAX_SPEED};
use crate::fsm::StateMachine;
use crate::systems::components::{DeltaTime, MaxSpeed, PlayerControlled, Velocity};
use crate::systems::player::PlayerState;

bitflags! {
    /// The five-key directional snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputFlags: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const SHIFT = 1 << 4;
    }
}

impl InputFlags {
    const DIRECTIONS: InputFlags = InputFlags::FORWARD
        .union(InputFlags::BACKWARD)
        .union(InputFlags::LEFT)
        .union(InputFlags::RIGHT);

    /// Whether any directional key (not shift) is held.
    pub fn any_direction(&self) -> bool {
        self.intersects(Self::DIRECTIONS)
    }
}

/// Read-only snapshot refreshed externally once per tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    pub flags: InputFlags,
}

fn axis(flags: InputFlags, positive: InputFlags, negative: InputFlags) -> f32 {
    f32::from(flags.contains(positive)) - f32::from(flags.contains(negative))
}

/// Applies the input snapshot to the human runner: shift picks the speed
/// cap, held keys add a normalized direction to velocity, and no input
/// brakes. Control is suppressed entirely once the runner is dead or
/// dancing.
pub fn player_control_system(
    time: Res<DeltaTime>,
    input: Res<InputState>,
    mut players: Query<(&StateMachine<PlayerState>, &mut Velocity, &mut MaxSpeed), bevy_ecs::query::With<PlayerControlled>>,
) {
    for (machine, mut velocity, mut max_speed) in players.iter_mut() {
        if matches!(machine.current(), Some(PlayerState::Dance | PlayerState::Dead)) {
            continue;
        }

        max_speed.0 = if input.flags.contains(InputFlags::SHIFT) {
            RUN_MAX_SPEED
        } else {
            WALK_MAX_SPEED
        };

        let direction = Vec3::new(
            axis(input.flags, InputFlags::RIGHT, InputFlags::LEFT),
            0.0,
            axis(input.flags, InputFlags::BACKWARD, InputFlags::FORWARD),
        )
        .normalize_or_zero();

        if direction == Vec3::ZERO {
            // brake
            velocity.0.x -= velocity.0.x * BRAKING_FORCE * time.seconds;
            velocity.0.z -= velocity.0.z * BRAKING_FORCE * time.seconds;
        } else {
            velocity.0 += direction;
        }
    }
}
