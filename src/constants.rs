//! Fixed gameplay values: field geometry, timings, population sizes and
//! animation clip lengths.

use glam::Vec3;

/// Playable field width along the x axis.
pub const FIELD_WIDTH: f32 = 30.0;
/// Playable field length along the z axis.
pub const FIELD_LENGTH: f32 = 100.0;
/// Bounding radius used for field clamping and trigger contact.
pub const BOUNDING_RADIUS: f32 = 0.6;

/// Duration of animation cross-fades between states.
pub const BLEND_DURATION: f32 = 0.5;

/// Countdown value the session starts from; it runs down to -1.
pub const COUNTDOWN_START: i32 = 59;
/// The doll toggles between green and red every time the countdown hits a
/// multiple of this period.
pub const PHASE_PERIOD: i32 = 5;
/// Countdown remainder at which careful seekers stop one tick before the
/// light can flip.
pub const CAUTION_TICK: i32 = 1;

/// Process-wide cap on AI entities assigned the wander-to-death strategy.
pub const MAX_SUICIDERS: u8 = 5;

/// Human walk speed cap.
pub const WALK_MAX_SPEED: f32 = 2.0;
/// Human run speed cap (shift held).
pub const RUN_MAX_SPEED: f32 = 4.0;
/// Velocity damping applied when no directional input is held.
pub const BRAKING_FORCE: f32 = 10.0;

/// Default AI runner population.
pub const NPC_COUNT: usize = 100;
/// AI runner max speed range.
pub const NPC_SPEED_MIN: f32 = 3.0;
pub const NPC_SPEED_MAX: f32 = 6.0;
/// AI runner spawn ranges (inclusive).
pub const NPC_SPAWN_X_MIN: i32 = -14;
pub const NPC_SPAWN_X_MAX: i32 = 14;
pub const NPC_SPAWN_Z_MIN: i32 = 47;
pub const NPC_SPAWN_Z_MAX: i32 = 50;

/// Depth the seek strategies aim for, just past the finish line.
pub const SEEK_TARGET_Z: f32 = -45.0;
/// Heading jitter applied per second by the wander strategy.
pub const WANDER_JITTER: f32 = 4.0;

pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 0.0, 50.0);
pub const DOLL_POSITION: Vec3 = Vec3::new(0.0, 0.0, -52.0);
/// Point the doll faces during green light (down-field, away from runners).
pub const DOLL_GREEN_FOCUS: Vec3 = Vec3::new(0.0, 0.0, -100.0);
/// Point the doll faces during red light and the final sweep.
pub const DOLL_RED_FOCUS: Vec3 = Vec3::ZERO;

pub const SOLDIER_OFFSET_X: f32 = 3.0;
pub const SOLDIER_Z: f32 = -50.0;

pub const FINISH_CENTER: Vec3 = Vec3::new(0.0, 0.0, -50.0);
pub const FINISH_SIZE: Vec3 = Vec3::new(50.0, 5.0, 10.0);

/// Animation clip lengths in seconds. The ratios matter: cross-fades between
/// walk and run scale playback time by clip duration to preserve stride.
pub mod clip {
    pub const IDLE: f32 = 2.4;
    pub const WALK: f32 = 1.2;
    pub const RUN: f32 = 0.8;
    pub const DANCE: f32 = 3.2;
    pub const DEAD: f32 = 2.6;
}
