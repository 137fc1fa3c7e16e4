//! Config - Tunable gameplay constants
//!
//! One parameterized core covers both shipped variants of the game;
//! everything that differed between them lives here.

use serde::{Deserialize, Serialize};
use crate::game::obstacle::ObstacleKind;

/// How a collision ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameOverPolicy {
    /// Race finishes on the frame the collision is detected.
    Immediate,
    /// Race enters a crashing phase for the given number of seconds
    /// (explosion plays out) before finishing.
    Delayed(f32),
}

/// Which flavor of the game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Online leaderboard, delayed game over.
    Championship,
    /// Local best score, immediate game over.
    Classic,
}

/// Gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Which variant this config was built for
    pub variant: Variant,
    /// Top speed without nitro (display units)
    pub max_speed: f32,
    /// Per-frame acceleration toward target speed
    pub acceleration: f32,
    /// Per-frame deceleration toward target speed
    pub deceleration: f32,
    /// Target speed while braking (negative so braking outruns coasting)
    pub brake_target: f32,
    /// Per-frame lateral rate at the reference speed
    pub turn_rate: f32,
    /// Speed at which `turn_rate` applies unscaled
    pub steer_reference_speed: f32,
    /// Speed multiplier while nitro is active
    pub nitro_boost: f32,
    /// Reserve drained per frame while boosting
    pub nitro_drain: f32,
    /// Reserve restored per frame while nitro intent is absent
    pub nitro_regen: f32,
    /// Full road width
    pub road_width: f32,
    /// Lateral distance between adjacent lanes
    pub lane_width: f32,
    /// Half the vehicle width, kept inside the road edge
    pub vehicle_margin: f32,
    /// World units scrolled per speed unit per second
    pub scroll_factor: f32,
    /// Forward drift applied per obstacle speed unit per second
    pub obstacle_drift_factor: f32,
    /// Fixed longitudinal position of the player vehicle
    pub player_z: f32,
    /// Obstacles below this z are passed and removed
    pub obstacle_despawn_z: f32,
    /// Score awarded for passing an obstacle
    pub pass_bonus: f32,
    /// Per-frame chance of spawning a new obstacle
    pub spawn_probability: f32,
    /// Concurrent obstacle cap
    pub max_obstacles: usize,
    /// Obstacles spawned when the race starts
    pub initial_obstacles: usize,
    /// Spawn placement: base z and random jitter above it
    pub spawn_z_base: f32,
    pub spawn_z_jitter: f32,
    /// Obstacle own-speed range
    pub obstacle_speed_min: f32,
    pub obstacle_speed_range: f32,
    /// Obstacle kinds this variant spawns
    pub obstacle_kinds: Vec<ObstacleKind>,
    /// Obstacle body colors (0xRRGGBB)
    pub obstacle_colors: Vec<u32>,
    /// Scenery below this z wraps forward by `track_loop_length`
    pub scenery_recycle_z: f32,
    /// Full loop length of the track
    pub track_loop_length: f32,
    /// Collision half-extents (center-distance test)
    pub collision_lateral: f32,
    pub collision_longitudinal: f32,
    /// Continuous score per speed unit per second
    pub score_rate: f32,
    /// Distance (km) per speed unit per second
    pub distance_rate: f32,
    /// Countdown length in seconds (3..2..1..GO)
    pub countdown_secs: f32,
    /// Minimum speed for the brake screech cue
    pub brake_cue_min_speed: f32,
    /// Speed above which the HUD shows speed lines
    pub speed_lines_threshold: f32,
    /// What happens after a collision
    pub game_over_policy: GameOverPolicy,
}

impl GameConfig {
    /// Championship tuning: online leaderboard, crash plays out before
    /// the results screen.
    pub fn championship() -> Self {
        Self {
            variant: Variant::Championship,
            max_speed: 320.0,
            acceleration: 0.45,
            deceleration: 0.28,
            brake_target: -25.0,
            turn_rate: 0.065,
            steer_reference_speed: 100.0,
            nitro_boost: 1.6,
            nitro_drain: 0.6,
            nitro_regen: 0.18,
            road_width: 16.0,
            lane_width: 4.5,
            vehicle_margin: 1.5,
            scroll_factor: 0.18,
            obstacle_drift_factor: 0.1,
            player_z: 6.0,
            obstacle_despawn_z: -35.0,
            pass_bonus: 120.0,
            spawn_probability: 0.018,
            max_obstacles: 14,
            initial_obstacles: 6,
            spawn_z_base: 280.0,
            spawn_z_jitter: 120.0,
            obstacle_speed_min: 50.0,
            obstacle_speed_range: 100.0,
            obstacle_kinds: vec![ObstacleKind::Sedan, ObstacleKind::Suv, ObstacleKind::Truck],
            obstacle_colors: vec![
                0x3B82F6, 0x10B981, 0xF59E0B, 0x8B5CF6, 0xEF4444, 0x06B6D4, 0xFFFFFF, 0x111111,
            ],
            scenery_recycle_z: -60.0,
            track_loop_length: 2500.0,
            collision_lateral: 2.0,
            collision_longitudinal: 4.5,
            score_rate: 0.12,
            distance_rate: 0.0012,
            countdown_secs: 4.0,
            brake_cue_min_speed: 60.0,
            speed_lines_threshold: 180.0,
            game_over_policy: GameOverPolicy::Delayed(0.5),
        }
    }

    /// Classic tuning: narrower road, softer nitro, local best score,
    /// game ends on the collision frame.
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            max_speed: 300.0,
            nitro_boost: 1.5,
            nitro_drain: 0.5,
            nitro_regen: 0.15,
            road_width: 14.0,
            max_obstacles: 12,
            obstacle_kinds: vec![ObstacleKind::Sedan, ObstacleKind::Truck],
            game_over_policy: GameOverPolicy::Immediate,
            ..Self::championship()
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Championship => Self::championship(),
            Variant::Classic => Self::classic(),
        }
    }

    /// Furthest lateral offset the vehicle center may reach.
    pub fn lateral_limit(&self) -> f32 {
        self.road_width / 2.0 - self.vehicle_margin
    }

    /// Top speed with nitro engaged.
    pub fn boosted_max_speed(&self) -> f32 {
        self.max_speed * self.nitro_boost
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::championship()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lateral_limit_leaves_room_for_the_vehicle() {
        let cfg = GameConfig::championship();
        assert_eq!(cfg.lateral_limit(), 6.5);
        assert!(cfg.lateral_limit() < cfg.road_width / 2.0);
    }

    #[test]
    fn variants_differ_where_expected() {
        let champ = GameConfig::championship();
        let classic = GameConfig::classic();
        assert!(classic.max_speed < champ.max_speed);
        assert!(classic.road_width < champ.road_width);
        assert_eq!(classic.game_over_policy, GameOverPolicy::Immediate);
        assert!(matches!(champ.game_over_policy, GameOverPolicy::Delayed(_)));
        assert!(classic.obstacle_kinds.len() < champ.obstacle_kinds.len());
    }

    #[test]
    fn boosted_max_exceeds_base() {
        let cfg = GameConfig::default();
        assert!(cfg.boosted_max_speed() > cfg.max_speed);
    }
}
