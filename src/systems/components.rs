//! Core components and resources shared across systems.

use bevy_ecs::bundle::Bundle;
use bevy_ecs::component::Component;
use bevy_ecs::resource::Resource;
use glam::Vec3;
use rand::rngs::SmallRng;

use crate::animation::AnimationSet;
use crate::fsm::StateMachine;
use crate::systems::behavior::Steering;
use crate::systems::player::PlayerState;

/// World-space position.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec3);

/// Velocity in units per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec3);

/// Cap applied to velocity during integration.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MaxSpeed(pub f32);

/// Facing direction, normalized. Follows the velocity heading while an
/// entity moves; states may point it at a fixed world focus.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub facing: Vec3,
}

impl Default for Orientation {
    fn default() -> Self {
        Self { facing: Vec3::NEG_Z }
    }
}

impl Orientation {
    /// Points the entity at a world-space target.
    pub fn face_toward(&mut self, position: Vec3, target: Vec3) {
        let direction = (target - position).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.facing = direction;
        }
    }
}

/// Lookup name, unique per entity ("player", "doll", "npc-17", ...).
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// Marker for the player category: every entity the doll scans and the
/// finish trigger watches. Covers the human runner and all AI runners.
#[derive(Default, Component)]
pub struct Runner;

/// Marker for the entity driven by the directional input snapshot.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// Marker for AI-driven runners.
#[derive(Default, Component)]
pub struct Npc;

/// Marker for the doll entity.
#[derive(Default, Component)]
pub struct Doll;

/// Marker for the decorative guards flanking the doll. They idle forever
/// and are not part of the player category.
#[derive(Default, Component)]
pub struct Soldier;

#[derive(Bundle)]
pub struct RunnerBundle {
    pub runner: Runner,
    pub name: Name,
    pub position: Position,
    pub velocity: Velocity,
    pub max_speed: MaxSpeed,
    pub orientation: Orientation,
    pub machine: StateMachine<PlayerState>,
    pub animations: AnimationSet,
}

#[derive(Bundle)]
pub struct NpcBundle {
    pub runner: RunnerBundle,
    pub npc: Npc,
    pub steering: Steering,
}

#[derive(Bundle)]
pub struct SoldierBundle {
    pub soldier: Soldier,
    pub name: Name,
    pub position: Position,
    pub velocity: Velocity,
    pub orientation: Orientation,
    pub machine: StateMachine<PlayerState>,
    pub animations: AnimationSet,
}

/// Seconds elapsed since the previous tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime {
    pub seconds: f32,
}

/// Session-scoped random number generator; seedable for deterministic
/// tests.
#[derive(Resource)]
pub struct SessionRng(pub SmallRng);
