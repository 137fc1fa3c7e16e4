//! Highway Rush - Tauri Backend
//!
//! Owns the full driving simulation and exposes commands for the
//! webview frontend, which renders the scene and plays the audio cues
//! the simulation asks for.

mod game;
mod leaderboard;
mod storage;

use game::input::TouchZone;
use game::race::{RaceResult, RaceSnapshot};
use game::simulation::{GameServer, GameState, ServerStats};
use game::Variant;
use leaderboard::{GlobalStats, LeaderboardClient, LeaderboardView, ScoreSubmission, SubmitOutcome};
use std::sync::Mutex;
use tauri::State;

/// Pick a variant and move to the registration screen
#[tauri::command]
fn init_game(server: State<'_, Mutex<GameServer>>, variant: Option<String>) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;

    let variant = match variant.as_deref() {
        Some("classic") => Variant::Classic,
        Some("championship") | None => Variant::Championship,
        Some(other) => return Err(format!("unknown variant: {other}")),
    };

    server.init_game(variant);
    log::info!("game initialized ({variant:?})");
    Ok(())
}

/// Register the player name shown on the HUD and the leaderboard
#[tauri::command]
fn register_player(server: State<'_, Mutex<GameServer>>, name: String) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.register_player(&name)?;
    log::info!("player registered: {}", server.player_name());
    Ok(())
}

/// Start (or retry) a race with a fresh world and armed countdown
#[tauri::command]
fn start_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.start_race()?;
    log::info!("race started");
    Ok(())
}

/// Perform a simulation tick and return the current state
#[tauri::command]
fn tick(server: State<'_, Mutex<GameServer>>) -> Result<Option<RaceSnapshot>, String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    Ok(server.tick())
}

/// Forward a keyboard event into the input mapper
#[tauri::command]
fn key_event(
    server: State<'_, Mutex<GameServer>>,
    key: String,
    pressed: bool,
) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.key_event(&key, pressed);
    Ok(())
}

/// Forward a touch-zone event into the input mapper
#[tauri::command]
fn touch_event(
    server: State<'_, Mutex<GameServer>>,
    zone: TouchZone,
    pressed: bool,
) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.touch_event(zone, pressed);
    Ok(())
}

/// Get current race snapshot without advancing simulation
#[tauri::command]
fn get_snapshot(server: State<'_, Mutex<GameServer>>) -> Result<Option<RaceSnapshot>, String> {
    let server = server.lock().map_err(|e| e.to_string())?;
    Ok(server.get_snapshot())
}

/// Get the final standing of the last finished run
#[tauri::command]
fn get_results(server: State<'_, Mutex<GameServer>>) -> Result<Option<RaceResult>, String> {
    let server = server.lock().map_err(|e| e.to_string())?;
    Ok(server.get_results())
}

/// Get server statistics
#[tauri::command]
fn get_stats(server: State<'_, Mutex<GameServer>>) -> Result<ServerStats, String> {
    let server = server.lock().map_err(|e| e.to_string())?;
    Ok(server.get_stats())
}

/// Get current game state
#[tauri::command]
fn get_game_state(server: State<'_, Mutex<GameServer>>) -> Result<GameState, String> {
    let server = server.lock().map_err(|e| e.to_string())?;
    Ok(server.get_state())
}

/// Locally persisted best score (Classic variant)
#[tauri::command]
fn get_best_score(server: State<'_, Mutex<GameServer>>) -> Result<u64, String> {
    let server = server.lock().map_err(|e| e.to_string())?;
    Ok(server.best_score())
}

/// Toggle between playing and paused
#[tauri::command]
fn toggle_pause(server: State<'_, Mutex<GameServer>>) -> Result<GameState, String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.toggle_pause();
    Ok(server.get_state())
}

/// Pause the simulation
#[tauri::command]
fn pause_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.pause();
    log::info!("race paused");
    Ok(())
}

/// Resume the simulation
#[tauri::command]
fn resume_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.resume();
    log::info!("race resumed");
    Ok(())
}

/// Abandon the race and return to the registration screen
#[tauri::command]
fn quit_to_menu(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.quit_to_menu();
    log::info!("returned to menu");
    Ok(())
}

/// Switch to the leaderboard screen
#[tauri::command]
fn show_leaderboard(server: State<'_, Mutex<GameServer>>) -> Result<GameState, String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.show_leaderboard();
    Ok(server.get_state())
}

/// Back from the leaderboard to the menu
#[tauri::command]
fn hide_leaderboard(server: State<'_, Mutex<GameServer>>) -> Result<GameState, String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    server.hide_leaderboard();
    Ok(server.get_state())
}

/// Toggle the sound; returns the new muted flag
#[tauri::command]
fn toggle_mute(server: State<'_, Mutex<GameServer>>) -> Result<bool, String> {
    let mut server = server.lock().map_err(|e| e.to_string())?;
    Ok(server.toggle_mute())
}

/// Fetch the top-10 board. Resolves to `None` on any service failure
/// so the screen shows its placeholder rows.
#[tauri::command]
async fn fetch_leaderboard(
    client: State<'_, LeaderboardClient>,
) -> Result<Option<LeaderboardView>, String> {
    match client.fetch_leaderboard().await {
        Ok(view) => Ok(Some(view)),
        Err(e) => {
            log::warn!("leaderboard fetch failed: {e}");
            Ok(None)
        }
    }
}

/// Fetch service-wide statistics; `None` on failure
#[tauri::command]
async fn fetch_global_stats(
    client: State<'_, LeaderboardClient>,
) -> Result<Option<GlobalStats>, String> {
    match client.fetch_stats().await {
        Ok(stats) => Ok(Some(stats)),
        Err(e) => {
            log::warn!("stats fetch failed: {e}");
            Ok(None)
        }
    }
}

/// Submit the last finished run. Resolves to `None` when there is
/// nothing to submit or the service is unreachable; the rank display
/// stays hidden in that case.
#[tauri::command]
async fn submit_score(
    server: State<'_, Mutex<GameServer>>,
    client: State<'_, LeaderboardClient>,
) -> Result<Option<SubmitOutcome>, String> {
    let submission = {
        let server = server.lock().map_err(|e| e.to_string())?;
        server.get_results().map(|result| ScoreSubmission {
            player_name: result.player_name,
            score: result.score as f64,
            distance: result.distance as f64,
            max_speed: result.max_speed as f64,
        })
    };

    let Some(submission) = submission else {
        return Ok(None);
    };

    match client.submit(&submission).await {
        Ok(outcome) => {
            log::info!(
                "score submitted, rank {:?} of {}",
                outcome.rank,
                outcome.total_players
            );
            Ok(Some(outcome))
        }
        Err(e) => {
            log::warn!("score submission failed: {e}");
            Ok(None)
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .manage(Mutex::new(GameServer::new()))
        .manage(LeaderboardClient::from_env())
        .setup(|app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            log::info!("Highway Rush game server initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            init_game,
            register_player,
            start_race,
            tick,
            key_event,
            touch_event,
            get_snapshot,
            get_results,
            get_stats,
            get_game_state,
            get_best_score,
            toggle_pause,
            pause_race,
            resume_race,
            quit_to_menu,
            show_leaderboard,
            hide_leaderboard,
            toggle_mute,
            fetch_leaderboard,
            fetch_global_stats,
            submit_score,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
