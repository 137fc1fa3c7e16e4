//! Game Module
//!
//! Runs the whole driving simulation in Rust: world scroll, traffic,
//! collisions, scoring, and the screen-state machine. Communicates
//! with the JS frontend via Tauri commands.

pub mod audio;
pub mod config;
pub mod input;
pub mod obstacle;
pub mod player;
pub mod race;
pub mod scenery;
pub mod simulation;

pub use config::{GameConfig, Variant};
pub use race::{Race, RaceStatus};
pub use simulation::{GameServer, GameState};
