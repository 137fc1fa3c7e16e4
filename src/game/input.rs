//! Input - Normalized control intents
//!
//! Event handlers only set flags here; the simulation step reads them
//! once per frame. Keyboard and touch surfaces map onto the same intent
//! vector.

use serde::{Deserialize, Serialize};

/// Transient control state, read once per frame
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub brake: bool,
    pub nitro: bool,
}

impl InputIntent {
    /// Drop every held intent (menu transitions, race start).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What a key event means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Accelerate,
    Brake,
    Nitro,
    PauseToggle,
}

/// Map a DOM key value to its action. Unbound keys return `None`.
pub fn map_key(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(KeyAction::Left),
        "ArrowRight" | "d" | "D" => Some(KeyAction::Right),
        "ArrowUp" | "w" | "W" => Some(KeyAction::Accelerate),
        "ArrowDown" | "s" | "S" => Some(KeyAction::Brake),
        " " => Some(KeyAction::Nitro),
        "Escape" | "p" | "P" => Some(KeyAction::PauseToggle),
        _ => None,
    }
}

/// Touch control zones on the mobile layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchZone {
    Left,
    Right,
    Nitro,
}

impl InputIntent {
    /// Apply a steering/throttle key state change.
    pub fn apply_key(&mut self, action: KeyAction, pressed: bool) {
        match action {
            KeyAction::Left => self.left = pressed,
            KeyAction::Right => self.right = pressed,
            KeyAction::Accelerate => self.accelerate = pressed,
            KeyAction::Brake => self.brake = pressed,
            KeyAction::Nitro => self.nitro = pressed,
            KeyAction::PauseToggle => {}
        }
    }

    /// Apply a touch zone change. A press latches the accelerate intent;
    /// release clears only the zone's own intent, so a finger anywhere on
    /// the controls keeps the car driving.
    pub fn apply_touch(&mut self, zone: TouchZone, pressed: bool) {
        match zone {
            TouchZone::Left => self.left = pressed,
            TouchZone::Right => self.right = pressed,
            TouchZone::Nitro => self.nitro = pressed,
        }
        if pressed {
            self.accelerate = true;
        }
    }
}
