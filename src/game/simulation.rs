//! Simulation - Main game server and loop
//!
//! Owns the outer game-state machine, handles tick updates, and
//! provides the interface for Tauri commands. Event handlers only set
//! input flags; all simulation math happens inside `tick`.

use std::time::Instant;
use serde::{Deserialize, Serialize};
use crate::game::config::{GameConfig, Variant};
use crate::game::input::{self, InputIntent, KeyAction, TouchZone};
use crate::game::race::{Race, RaceResult, RaceSnapshot, RaceStatus};
use crate::storage::BestScoreStore;

/// Screen-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Loading,
    Registration,
    Countdown,
    Playing,
    Paused,
    GameOver,
    Leaderboard,
}

/// Server statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub tick_rate: f32,
    pub avg_tick_time_ms: f32,
    pub obstacle_count: u32,
    pub game_state: GameState,
}

/// Main game server
pub struct GameServer {
    /// Current screen-level state
    state: GameState,
    /// Active variant configuration
    config: GameConfig,
    /// Active race (if any)
    race: Option<Race>,
    /// Registered player name (empty until registration)
    player_name: String,
    /// Control intents, written by event handlers, read by tick
    input: InputIntent,
    /// Final standing of the last finished run
    result: Option<RaceResult>,
    /// Local best-score persistence (Classic variant)
    store: BestScoreStore,
    /// Frontend sound toggle
    muted: bool,
    /// Target tick rate (ticks per second)
    tick_rate: f32,
    /// Last tick timestamp
    last_tick: Instant,
    /// Accumulated tick time for averaging
    tick_times: Vec<f32>,
    /// Whether the simulation is advancing
    running: bool,
}

impl GameServer {
    /// Create a new game server
    pub fn new() -> Self {
        Self::with_store(BestScoreStore::open_default())
    }

    /// Create a server with an explicit best-score store
    pub fn with_store(store: BestScoreStore) -> Self {
        Self {
            state: GameState::Loading,
            config: GameConfig::default(),
            race: None,
            player_name: String::new(),
            input: InputIntent::default(),
            result: None,
            store,
            muted: false,
            tick_rate: 60.0,
            last_tick: Instant::now(),
            tick_times: Vec::with_capacity(60),
            running: false,
        }
    }

    /// Select a variant and move from loading to the registration screen.
    pub fn init_game(&mut self, variant: Variant) {
        self.config = GameConfig::for_variant(variant);
        self.race = None;
        self.result = None;
        self.running = false;
        self.state = GameState::Registration;
    }

    /// Register the player. Names shorter than two characters are
    /// rejected and the start control stays blocked.
    pub fn register_player(&mut self, name: &str) -> Result<(), String> {
        let trimmed = name.trim();
        if trimmed.chars().count() < 2 {
            return Err("player name must be at least 2 characters".into());
        }
        self.player_name = trimmed.to_string();
        Ok(())
    }

    /// Start (or restart) a race: fresh world, armed countdown.
    pub fn start_race(&mut self) -> Result<(), String> {
        if self.player_name.is_empty() {
            return Err("no player registered".into());
        }

        self.input.clear();
        self.result = None;
        self.race = Some(Race::new(self.config.clone()));
        self.state = GameState::Countdown;
        self.running = true;
        self.last_tick = Instant::now();
        Ok(())
    }

    /// Perform a single simulation tick and return the current state
    pub fn tick(&mut self) -> Option<RaceSnapshot> {
        if !self.running {
            return self.get_snapshot();
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        // Track tick timing
        let tick_start = Instant::now();

        let audio = self.race.as_mut().map(|race| {
            let input = self.input;
            race.update(delta, &input)
        })?;
        let audio = if self.muted { audio.silenced() } else { audio };

        // Reflect the race status into the screen state
        match self.race.as_ref().map(|r| r.status) {
            Some(RaceStatus::Countdown) => self.state = GameState::Countdown,
            Some(RaceStatus::Racing) | Some(RaceStatus::Crashing) => {
                self.state = GameState::Playing;
            }
            Some(RaceStatus::Finished) => {
                if self.result.is_none() {
                    self.finalize_run();
                }
                self.state = GameState::GameOver;
                self.running = false;
            }
            None => {}
        }

        // Record tick time
        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        if self.tick_times.len() > 60 {
            self.tick_times.remove(0);
        }

        self.race.as_ref().map(|r| r.get_snapshot(audio))
    }

    /// Compute the final standing and persist the best score where the
    /// variant calls for it.
    fn finalize_run(&mut self) {
        let Some(race) = &self.race else { return };
        let stats = &race.stats;

        let (best_score, new_best) = match self.config.variant {
            Variant::Classic => match self.store.record(stats.score as u64) {
                Ok(outcome) => (Some(outcome.best), outcome.improved),
                Err(e) => {
                    log::warn!("best score not persisted: {e}");
                    (None, false)
                }
            },
            Variant::Championship => (None, false),
        };

        self.result = Some(RaceResult {
            player_name: self.player_name.clone(),
            score: stats.score,
            distance: stats.distance,
            max_speed: stats.max_speed,
            best_score,
            new_best,
        });
        log::info!(
            "race over for {}: score {:.0}, {:.1} km, top speed {:.0}",
            self.player_name,
            stats.score,
            stats.distance,
            stats.max_speed
        );
    }

    /// Route a keyboard event. Key-down only registers while playing;
    /// key-up always clears so transitions cannot leave stuck intents.
    pub fn key_event(&mut self, key: &str, pressed: bool) {
        let Some(action) = input::map_key(key) else { return };

        if action == KeyAction::PauseToggle {
            if pressed {
                self.toggle_pause();
            }
            return;
        }

        if pressed && self.state != GameState::Playing {
            return;
        }
        self.input.apply_key(action, pressed);
    }

    /// Route a touch-zone event. Touch is ungated so a finger planted
    /// before "GO" launches the car off the line.
    pub fn touch_event(&mut self, zone: TouchZone, pressed: bool) {
        self.input.apply_touch(zone, pressed);
    }

    /// Toggle between playing and paused; no-op in other states.
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            _ => {}
        }
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
            self.running = false;
        }
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
            self.running = true;
            self.last_tick = Instant::now();
        }
    }

    /// Drop the race and return to the registration screen.
    pub fn quit_to_menu(&mut self) {
        self.state = GameState::Registration;
        self.race = None;
        self.result = None;
        self.input.clear();
        self.running = false;
        self.tick_times.clear();
    }

    /// Show the leaderboard screen (from the menu or results).
    pub fn show_leaderboard(&mut self) {
        if matches!(self.state, GameState::Registration | GameState::GameOver) {
            self.state = GameState::Leaderboard;
        }
    }

    /// Back from the leaderboard to the menu.
    pub fn hide_leaderboard(&mut self) {
        if self.state == GameState::Leaderboard {
            self.state = GameState::Registration;
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Get current race snapshot without advancing simulation
    pub fn get_snapshot(&self) -> Option<RaceSnapshot> {
        self.race.as_ref().map(|r| r.get_snapshot(r.idle_audio()))
    }

    /// Get the last finished run's standing
    pub fn get_results(&self) -> Option<RaceResult> {
        self.result.clone()
    }

    /// Locally persisted best score (0 when absent or unreadable)
    pub fn best_score(&self) -> u64 {
        self.store.best().unwrap_or_default()
    }

    /// Get server statistics
    pub fn get_stats(&self) -> ServerStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        ServerStats {
            tick_rate: self.tick_rate,
            avg_tick_time_ms: avg_tick_time,
            obstacle_count: self
                .race
                .as_ref()
                .map(|r| r.obstacles.len() as u32)
                .unwrap_or(0),
            game_state: self.state,
        }
    }

    /// Get current game state
    pub fn get_state(&self) -> GameState {
        self.state
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Check if the simulation is advancing
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub(crate) fn race_mut(&mut self) -> Option<&mut Race> {
        self.race.as_mut()
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}
