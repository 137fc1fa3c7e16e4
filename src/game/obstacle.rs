//! Obstacle - Traffic vehicles
//!
//! Spawned far ahead with a random lane, kind, color, and own forward
//! speed. The race scrolls them toward the camera and removes them once
//! they pass behind it.

use serde::{Deserialize, Serialize};
use crate::game::config::GameConfig;

/// Traffic vehicle class (light / medium / heavy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Sedan,
    Suv,
    Truck,
}

/// Complete state for one traffic vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleState {
    /// Stable id so the frontend can reuse meshes
    pub id: u32,
    pub kind: ObstacleKind,
    /// Body color, 0xRRGGBB
    pub color: u32,
    /// Fixed lateral offset (one of three lanes)
    pub lane: f32,
    /// Own forward speed, combined against the world scroll
    pub speed: f32,
    /// Longitudinal position
    pub z: f32,
}

impl ObstacleState {
    /// Roll a fresh obstacle at the far spawn band.
    pub fn spawn(id: u32, config: &GameConfig) -> Self {
        let kind_idx = (rand::random::<f32>() * config.obstacle_kinds.len() as f32) as usize;
        let color_idx = (rand::random::<f32>() * config.obstacle_colors.len() as f32) as usize;
        let lane_idx = (rand::random::<f32>() * 3.0).floor() as i32 - 1;

        Self {
            id,
            kind: config.obstacle_kinds[kind_idx],
            color: config.obstacle_colors[color_idx],
            lane: lane_idx as f32 * config.lane_width,
            speed: config.obstacle_speed_min + rand::random::<f32>() * config.obstacle_speed_range,
            z: config.spawn_z_base + rand::random::<f32>() * config.spawn_z_jitter,
        }
    }

    /// Center-distance proximity test against the player. Both axes are
    /// strict, so touching the threshold exactly is not a hit.
    pub fn overlaps(&self, player_x: f32, player_z: f32, config: &GameConfig) -> bool {
        let dx = (player_x - self.lane).abs();
        let dz = (player_z - self.z).abs();
        dx < config.collision_lateral && dz < config.collision_longitudinal
    }

    /// Gone behind the camera and counts as passed.
    pub fn is_passed(&self, config: &GameConfig) -> bool {
        self.z < config.obstacle_despawn_z
    }
}
