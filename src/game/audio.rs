//! Audio - Simulation-state-to-cue mapping
//!
//! The backend never touches an audio device; it tells the frontend
//! what to play. One-shot cues are edge-triggered through `SoundState`
//! so a held button fires its sound once, not every frame.

use serde::{Deserialize, Serialize};
use crate::game::config::GameConfig;
use crate::game::player::DriveFrame;

/// Edge-trigger flags for one-shot cues
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SoundState {
    pub is_braking: bool,
    pub was_nitro: bool,
}

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// Countdown tick; high pitch on "GO"
    Beep { high: bool },
    NitroWhoosh,
    BrakeScreech,
    ObstaclePass,
    Explosion,
    EngineStart,
    EngineStop,
}

/// Continuous engine tone parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineTone {
    pub pitch_hz: f32,
    pub volume: f32,
    pub running: bool,
}

impl EngineTone {
    pub fn off() -> Self {
        Self { pitch_hz: 0.0, volume: 0.0, running: false }
    }
}

/// Everything the frontend's sound system needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFrame {
    pub engine: EngineTone,
    pub cues: Vec<AudioCue>,
}

impl AudioFrame {
    /// Mute: drop the cues and zero the engine, keep the pitch so the
    /// oscillator does not snap when unmuted.
    pub fn silenced(mut self) -> Self {
        self.cues.clear();
        self.engine.volume = 0.0;
        self
    }
}

/// Engine pitch and volume tracking speed and throttle.
pub fn engine_tone(config: &GameConfig, speed: f32, accelerating: bool) -> EngineTone {
    let rel = speed / config.max_speed;
    EngineTone {
        pitch_hz: 45.0 + rel * 120.0,
        volume: if accelerating { 0.12 + rel * 0.18 } else { 0.04 },
        running: true,
    }
}

/// Turn one drive frame into edge-triggered cues.
pub fn react(
    sound: &mut SoundState,
    frame: &DriveFrame,
    config: &GameConfig,
    cues: &mut Vec<AudioCue>,
) {
    if frame.accelerating {
        if frame.boosting {
            if !sound.was_nitro {
                cues.push(AudioCue::NitroWhoosh);
                sound.was_nitro = true;
            }
        } else {
            sound.was_nitro = false;
        }
    } else if frame.braking {
        if !sound.is_braking && frame.entry_speed > config.brake_cue_min_speed {
            cues.push(AudioCue::BrakeScreech);
            sound.is_braking = true;
        }
    } else {
        sound.is_braking = false;
        sound.was_nitro = false;
    }

    if !frame.braking {
        sound.is_braking = false;
    }
}
