//! Audio cue surface.
//!
//! The core only decides *when* sounds happen; playback itself belongs to
//! an external collaborator. Cues travel as events and are folded into an
//! [`AudioState`] resource that records what the output device would be
//! doing, which is also what the tests assert against.

use bevy_ecs::event::{Event, EventReader};
use bevy_ecs::resource::Resource;
use strum_macros::Display;
use tracing::{debug, trace};

/// The sounds the session uses.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// The looping countdown song; spans green and red phases.
    Song,
    /// Fired once per elimination broadcast.
    Gunfire,
}

/// Events for triggering audio playback.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Play(Sound),
    Stop(Sound),
}

/// Resource tracking cue state for the external playback device.
#[derive(Resource, Debug, Clone, Default)]
pub struct AudioState {
    /// Whether audio is currently muted.
    muted: bool,
    /// Whether the countdown song is playing.
    pub song_playing: bool,
    /// Number of gunfire cues fired so far.
    pub gunfire_count: u32,
}

impl AudioState {
    /// Mutes or unmutes the output device. Cues arriving while muted are
    /// dropped, not deferred; muting also silences the song.
    pub fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.song_playing = false;
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

/// Drains audio events into the cue state.
pub fn audio_system(mut state: bevy_ecs::system::ResMut<AudioState>, mut events: EventReader<AudioEvent>) {
    for event in events.read() {
        match event {
            AudioEvent::Play(Sound::Gunfire) => {
                if state.muted {
                    continue;
                }
                state.gunfire_count += 1;
                trace!(count = state.gunfire_count, "Gunfire cue");
            }
            AudioEvent::Play(Sound::Song) => {
                if state.muted {
                    continue;
                }
                debug!("Song cue started");
                state.song_playing = true;
            }
            AudioEvent::Stop(Sound::Song) => {
                debug!("Song cue stopped");
                state.song_playing = false;
            }
            AudioEvent::Stop(Sound::Gunfire) => {}
        }
    }
}
