//! Race - One run of the game
//!
//! Owns the player, traffic, scenery, and stats for a single race and
//! advances them one frame at a time. The countdown and the
//! crash-to-game-over delay are plain expiry values decremented by
//! `dt`, so they die with the race instead of outliving it in a host
//! timer.

use serde::{Deserialize, Serialize};
use crate::game::audio::{self, AudioCue, AudioFrame, EngineTone, SoundState};
use crate::game::config::{GameConfig, GameOverPolicy};
use crate::game::input::InputIntent;
use crate::game::obstacle::ObstacleState;
use crate::game::player::{PlayerState, Vehicle};
use crate::game::scenery::{self, SceneryItem};

/// Race status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    Countdown,
    Racing,
    /// Collision registered, explosion playing out (delayed policy)
    Crashing,
    Finished,
}

/// Cumulative run statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStats {
    pub score: f32,
    /// Kilometers traveled
    pub distance: f32,
    pub max_speed: f32,
}

/// Final standing of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResult {
    pub player_name: String,
    pub score: f32,
    pub distance: f32,
    pub max_speed: f32,
    /// Locally persisted best (Classic variant)
    pub best_score: Option<u64>,
    pub new_best: bool,
}

/// HUD overlay toggles derived from simulation state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EffectFlags {
    pub speed_lines: bool,
    pub boost_overlay: bool,
}

/// Complete race state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub config: GameConfig,
    pub status: RaceStatus,
    pub player: PlayerState,
    pub obstacles: Vec<ObstacleState>,
    pub scenery: Vec<SceneryItem>,
    pub stats: GameStats,
    pub sound: SoundState,
    /// Countdown remaining (seconds)
    countdown: f32,
    /// Last countdown number shown, to edge-trigger the beeps
    last_count: i32,
    /// Remaining explosion time under the delayed game-over policy
    crash_timer: f32,
    next_obstacle_id: u32,
    engine_running: bool,
}

impl Race {
    /// Create a race on its starting grid with the countdown armed.
    pub fn new(config: GameConfig) -> Self {
        let scenery = scenery::build_world(&config);
        let countdown = config.countdown_secs;
        Self {
            config,
            status: RaceStatus::Countdown,
            player: PlayerState::new(),
            obstacles: Vec::new(),
            scenery,
            stats: GameStats::default(),
            sound: SoundState::default(),
            countdown,
            last_count: countdown.ceil() as i32,
            crash_timer: 0.0,
            next_obstacle_id: 0,
            engine_running: false,
        }
    }

    /// Advance one frame and report what the frontend should play.
    pub fn update(&mut self, dt: f32, input: &InputIntent) -> AudioFrame {
        let mut cues = Vec::new();

        let accelerating = match self.status {
            RaceStatus::Countdown => {
                self.step_countdown(dt, &mut cues);
                false
            }
            RaceStatus::Racing => self.step_racing(dt, input, &mut cues),
            RaceStatus::Crashing => {
                self.step_crashing(dt, &mut cues);
                false
            }
            RaceStatus::Finished => false,
        };

        let engine = if self.engine_running {
            audio::engine_tone(&self.config, self.player.speed, accelerating)
        } else {
            EngineTone::off()
        };

        AudioFrame { engine, cues }
    }

    fn step_countdown(&mut self, dt: f32, cues: &mut Vec<AudioCue>) {
        self.countdown -= dt;

        let display = self.countdown_display();
        if display < self.last_count {
            self.last_count = display;
            cues.push(AudioCue::Beep { high: display == 0 });
        }

        if self.countdown <= 0.0 {
            self.countdown = 0.0;
            self.status = RaceStatus::Racing;
            self.engine_running = true;
            cues.push(AudioCue::EngineStart);

            for _ in 0..self.config.initial_obstacles {
                self.spawn_obstacle();
            }
            log::info!("countdown finished, racing with {} obstacles", self.obstacles.len());
        }
    }

    fn step_racing(&mut self, dt: f32, input: &InputIntent, cues: &mut Vec<AudioCue>) -> bool {
        let drive = Vehicle::update(&mut self.player, &self.config, input, dt);
        audio::react(&mut self.sound, &drive, &self.config, cues);

        if self.player.speed > self.stats.max_speed {
            self.stats.max_speed = self.player.speed;
        }

        // The world moves toward the viewer; the player's z never does
        let move_amount = self.player.speed * dt * self.config.scroll_factor;
        scenery::scroll(&mut self.scenery, &self.config, move_amount);

        // Traffic combines the scroll with its own forward speed
        let mut collided = false;
        let mut i = 0;
        while i < self.obstacles.len() {
            let obs = &mut self.obstacles[i];
            obs.z -= move_amount - obs.speed * dt * self.config.obstacle_drift_factor;

            if obs.is_passed(&self.config) {
                self.obstacles.remove(i);
                self.stats.score += self.config.pass_bonus;
                cues.push(AudioCue::ObstaclePass);
                continue;
            }
            if obs.overlaps(self.player.x, self.config.player_z, &self.config) {
                collided = true;
            }
            i += 1;
        }

        if self.obstacles.len() < self.config.max_obstacles
            && rand::random::<f32>() < self.config.spawn_probability
        {
            self.spawn_obstacle();
        }

        self.stats.distance += self.player.speed * dt * self.config.distance_rate;
        self.stats.score += self.player.speed * dt * self.config.score_rate;

        if collided {
            self.crash(cues);
        }

        drive.accelerating
    }

    fn step_crashing(&mut self, dt: f32, cues: &mut Vec<AudioCue>) {
        self.crash_timer -= dt;
        if self.crash_timer <= 0.0 {
            self.finish(cues);
        }
    }

    /// A collision was detected this frame.
    fn crash(&mut self, cues: &mut Vec<AudioCue>) {
        cues.push(AudioCue::Explosion);
        log::info!(
            "collision at x={:.2}, score {:.0}",
            self.player.x,
            self.stats.score
        );

        match self.config.game_over_policy {
            GameOverPolicy::Immediate => self.finish(cues),
            GameOverPolicy::Delayed(secs) => {
                self.status = RaceStatus::Crashing;
                self.crash_timer = secs;
            }
        }
    }

    fn finish(&mut self, cues: &mut Vec<AudioCue>) {
        self.status = RaceStatus::Finished;
        self.engine_running = false;
        cues.push(AudioCue::EngineStop);
    }

    /// Number on the countdown overlay: 3..1, then 0 for "GO".
    pub fn countdown_display(&self) -> i32 {
        (self.countdown.ceil() as i32 - 1).clamp(0, 3)
    }

    pub fn spawn_obstacle(&mut self) {
        let obs = ObstacleState::spawn(self.next_obstacle_id, &self.config);
        self.next_obstacle_id += 1;
        self.obstacles.push(obs);
    }

    pub fn effect_flags(&self) -> EffectFlags {
        EffectFlags {
            speed_lines: self.player.speed > self.config.speed_lines_threshold,
            boost_overlay: self.player.is_nitro,
        }
    }

    /// Engine tone for a frame where the simulation did not advance
    /// (paused, or a pure state query).
    pub fn idle_audio(&self) -> AudioFrame {
        let engine = if self.engine_running {
            audio::engine_tone(&self.config, self.player.speed, false)
        } else {
            EngineTone::off()
        };
        AudioFrame { engine, cues: Vec::new() }
    }

    /// Snapshot for IPC transfer, carrying this frame's audio.
    pub fn get_snapshot(&self, audio: AudioFrame) -> RaceSnapshot {
        RaceSnapshot {
            status: self.status,
            countdown: self.countdown,
            countdown_display: self.countdown_display(),
            player: self.player.clone(),
            stats: self.stats.clone(),
            obstacles: self.obstacles.clone(),
            scenery: self.scenery.clone(),
            fx: self.effect_flags(),
            audio,
        }
    }
}

/// Complete per-frame state for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub status: RaceStatus,
    pub countdown: f32,
    pub countdown_display: i32,
    pub player: PlayerState,
    pub stats: GameStats,
    pub obstacles: Vec<ObstacleState>,
    pub scenery: Vec<SceneryItem>,
    pub fx: EffectFlags,
    pub audio: AudioFrame,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::obstacle::ObstacleKind;

    const DT: f32 = 1.0 / 60.0;

    fn racing_race(config: GameConfig) -> Race {
        let mut race = Race::new(config);
        let input = InputIntent::default();
        // Run the countdown out
        for _ in 0..100 {
            race.update(0.1, &input);
            if race.status == RaceStatus::Racing {
                break;
            }
        }
        assert_eq!(race.status, RaceStatus::Racing);
        race
    }

    fn in_lane_obstacle(id: u32, z: f32) -> ObstacleState {
        ObstacleState {
            id,
            kind: ObstacleKind::Sedan,
            color: 0xFFFFFF,
            lane: 0.0,
            speed: 0.0,
            z,
        }
    }

    #[test]
    fn countdown_beeps_then_starts_the_race() {
        let mut race = Race::new(GameConfig::championship());
        let input = InputIntent::default();
        let mut cues = Vec::new();

        let mut displays = Vec::new();
        while race.status == RaceStatus::Countdown {
            let frame = race.update(0.25, &input);
            displays.push(race.countdown_display());
            cues.extend(frame.cues);
        }

        let beeps: Vec<bool> = cues
            .iter()
            .filter_map(|c| match c {
                AudioCue::Beep { high } => Some(*high),
                _ => None,
            })
            .collect();
        assert_eq!(beeps, vec![false, false, false, true]);
        assert!(cues.contains(&AudioCue::EngineStart));

        // Display walked 3 -> 0 without skipping
        assert!(displays.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(race.status, RaceStatus::Racing);
        assert_eq!(race.obstacles.len(), race.config.initial_obstacles);
    }

    #[test]
    fn holding_accelerate_accrues_score_distance_and_nitro() {
        let mut race = racing_race(GameConfig::championship());
        // Empty road so nothing can end the run early
        race.obstacles.clear();
        race.config.spawn_probability = 0.0;
        race.player.nitro = 40.0;
        let input = InputIntent { accelerate: true, ..InputIntent::default() };

        let mut last_score = race.stats.score;
        let mut last_distance = race.stats.distance;
        for _ in 0..1200 {
            race.update(DT, &input);
            assert!(race.stats.score > last_score);
            assert!(race.stats.distance > last_distance);
            last_score = race.stats.score;
            last_distance = race.stats.distance;
        }

        assert!(race.player.speed > race.config.max_speed * 0.95);
        assert_eq!(race.player.nitro, 100.0);
        assert!(race.stats.max_speed >= race.player.speed);
        assert_eq!(race.status, RaceStatus::Racing);
    }

    #[test]
    fn passing_an_obstacle_scores_exactly_once() {
        let mut race = racing_race(GameConfig::championship());
        race.obstacles.clear();
        race.config.spawn_probability = 0.0;
        race.obstacles.push(in_lane_obstacle(900, -34.9));
        race.player.speed = 100.0;

        let score_before = race.stats.score;
        let frame = race.update(0.1, &InputIntent::default());

        assert!(race.obstacles.is_empty());
        let passes = frame.cues.iter().filter(|c| **c == AudioCue::ObstaclePass).count();
        assert_eq!(passes, 1);
        assert!(race.stats.score >= score_before + race.config.pass_bonus);

        // Gone means gone: no second award
        let frame = race.update(0.1, &InputIntent::default());
        assert!(!frame.cues.contains(&AudioCue::ObstaclePass));
    }

    #[test]
    fn obstacle_count_respects_the_cap() {
        let mut race = racing_race(GameConfig::championship());
        race.config.spawn_probability = 1.0;
        race.player.speed = 0.0;

        for _ in 0..200 {
            race.update(DT, &InputIntent::default());
            assert!(race.obstacles.len() <= race.config.max_obstacles);
        }
        assert_eq!(race.obstacles.len(), race.config.max_obstacles);
    }

    #[test]
    fn collision_crashes_then_finishes_under_the_delayed_policy() {
        let mut race = racing_race(GameConfig::championship());
        race.obstacles.clear();
        race.config.spawn_probability = 0.0;
        race.obstacles.push(in_lane_obstacle(901, race.config.player_z + 1.0));

        let frame = race.update(DT, &InputIntent::default());
        assert_eq!(race.status, RaceStatus::Crashing);
        let explosions = frame.cues.iter().filter(|c| **c == AudioCue::Explosion).count();
        assert_eq!(explosions, 1);

        // Driving is frozen while the explosion plays out
        let speed = race.player.speed;
        let frame = race.update(0.3, &InputIntent { accelerate: true, ..InputIntent::default() });
        assert_eq!(race.player.speed, speed);
        assert_eq!(race.status, RaceStatus::Crashing);
        assert!(!frame.cues.contains(&AudioCue::Explosion));

        let frame = race.update(0.3, &InputIntent::default());
        assert_eq!(race.status, RaceStatus::Finished);
        assert!(frame.cues.contains(&AudioCue::EngineStop));
        assert!(!frame.engine.running);
    }

    #[test]
    fn collision_ends_the_race_at_once_under_the_immediate_policy() {
        let mut race = racing_race(GameConfig::classic());
        race.obstacles.clear();
        race.config.spawn_probability = 0.0;
        race.obstacles.push(in_lane_obstacle(902, race.config.player_z));

        let frame = race.update(DT, &InputIntent::default());
        assert_eq!(race.status, RaceStatus::Finished);
        assert!(frame.cues.contains(&AudioCue::Explosion));
        assert!(frame.cues.contains(&AudioCue::EngineStop));

        // Finished races are inert
        let frame = race.update(DT, &InputIntent::default());
        assert!(frame.cues.is_empty());
    }

    #[test]
    fn off_lane_traffic_does_not_collide() {
        let mut race = racing_race(GameConfig::championship());
        race.obstacles.clear();
        race.config.spawn_probability = 0.0;
        let mut obs = in_lane_obstacle(903, race.config.player_z);
        obs.lane = race.config.lane_width;
        race.obstacles.push(obs);

        race.update(DT, &InputIntent::default());
        assert_eq!(race.status, RaceStatus::Racing);
    }

    #[test]
    fn faster_traffic_recedes_slower_than_the_world() {
        let mut race = racing_race(GameConfig::championship());
        race.obstacles.clear();
        race.config.spawn_probability = 0.0;
        let mut slow = in_lane_obstacle(904, 200.0);
        slow.speed = 0.0;
        slow.lane = -race.config.lane_width;
        let mut fast = in_lane_obstacle(905, 200.0);
        fast.speed = 140.0;
        race.obstacles.push(slow);
        race.obstacles.push(fast);
        race.player.speed = 150.0;

        race.update(0.1, &InputIntent::default());
        let slow_z = race.obstacles[0].z;
        let fast_z = race.obstacles[1].z;
        assert!(slow_z < 200.0);
        assert!(fast_z > slow_z);
    }

    #[test]
    fn snapshot_reflects_hud_effects() {
        let mut race = racing_race(GameConfig::championship());
        race.player.speed = 200.0;
        race.player.is_nitro = true;

        let snapshot = race.get_snapshot(race.idle_audio());
        assert!(snapshot.fx.speed_lines);
        assert!(snapshot.fx.boost_overlay);
        assert_eq!(snapshot.status, RaceStatus::Racing);
        assert!(!snapshot.scenery.is_empty());
        // Engine runs while racing, even in a pure query
        assert!(snapshot.audio.engine.running);
        assert!(snapshot.audio.cues.is_empty());
    }
}
