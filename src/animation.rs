//! Headless animation playback surface.
//!
//! The renderer owns the real mixer; the core only needs a controllable
//! clip handle per state supporting play, cross-fade, loop-once and
//! clamp-on-finish. [`Clip`] records exactly those operations so the state
//! machines can drive playback and tests can inspect what was requested.

use std::collections::HashMap;

use bevy_ecs::component::Component;
use bevy_ecs::system::{Query, Res};

use crate::error::{AnimationError, GameResult};
use crate::systems::components::DeltaTime;
use crate::systems::player::PlayerState;

/// How a clip behaves when playback reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Repeat,
    Once,
}

/// The most recent cross-fade requested on a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    pub from: PlayerState,
    pub duration: f32,
}

/// A controllable animation clip handle.
#[derive(Debug, Clone)]
pub struct Clip {
    pub duration: f32,
    pub time: f32,
    pub enabled: bool,
    pub weight: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    pub clamp_when_finished: bool,
    pub last_fade: Option<CrossFade>,
}

impl Clip {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            time: 0.0,
            enabled: false,
            weight: 1.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            last_fade: None,
        }
    }

    /// Advances playback, wrapping or clamping depending on loop mode.
    fn advance(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        self.time += dt * self.time_scale;
        match self.loop_mode {
            LoopMode::Repeat => {
                if self.time >= self.duration {
                    self.time %= self.duration;
                }
            }
            LoopMode::Once => {
                if self.time >= self.duration {
                    self.time = self.duration;
                    if !self.clamp_when_finished {
                        self.enabled = false;
                    }
                }
            }
        }
    }
}

/// Mapping from player state to its clip handle. Runners carry the full
/// set; soldiers only register an idle clip.
#[derive(Component, Debug, Clone)]
pub struct AnimationSet {
    clips: HashMap<PlayerState, Clip>,
}

impl AnimationSet {
    pub fn new(clips: impl IntoIterator<Item = (PlayerState, Clip)>) -> Self {
        Self {
            clips: clips.into_iter().collect(),
        }
    }

    /// Fails if any of `required` has no clip. Called at spawn so that an
    /// incomplete asset load surfaces before the first tick.
    pub fn validate(&self, required: &[PlayerState]) -> GameResult<()> {
        for state in required {
            if !self.clips.contains_key(state) {
                return Err(AnimationError::MissingClip(state.to_string()).into());
            }
        }
        Ok(())
    }

    pub fn clip(&self, state: PlayerState) -> GameResult<&Clip> {
        self.clips
            .get(&state)
            .ok_or_else(|| AnimationError::MissingClip(state.to_string()).into())
    }

    pub fn clip_mut(&mut self, state: PlayerState) -> GameResult<&mut Clip> {
        self.clips
            .get_mut(&state)
            .ok_or_else(|| AnimationError::MissingClip(state.to_string()).into())
    }

    /// Cross-fades from `from` into `to` over `duration`. When `sync` is
    /// set, the target clip's playback time is scaled by the clip-duration
    /// ratio so stride continuity is preserved; otherwise playback restarts
    /// from zero at full weight and speed.
    pub fn cross_fade(&mut self, from: PlayerState, to: PlayerState, duration: f32, sync: bool) -> GameResult<()> {
        let (from_time, from_duration) = {
            let prev = self.clip(from)?;
            (prev.time, prev.duration)
        };
        let clip = self.clip_mut(to)?;
        clip.enabled = true;
        if sync {
            let ratio = clip.duration / from_duration;
            clip.time = from_time * ratio;
        } else {
            clip.time = 0.0;
            clip.time_scale = 1.0;
            clip.weight = 1.0;
        }
        clip.last_fade = Some(CrossFade { from, duration });
        Ok(())
    }

    fn advance(&mut self, dt: f32) {
        for clip in self.clips.values_mut() {
            clip.advance(dt);
        }
    }
}

/// Advances every entity's clips once per tick, standing in for the
/// renderer's mixer update.
pub fn animation_system(time: Res<DeltaTime>, mut sets: Query<&mut AnimationSet>) {
    for mut set in sets.iter_mut() {
        set.advance(time.seconds);
    }
}
