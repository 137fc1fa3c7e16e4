//! Player - Vehicle state and per-frame drive integration
//!
//! Speed chases a target resolved from the control intents; steering
//! authority scales with speed. All rates are tuned per 60 Hz frame and
//! scaled by `dt`.

use serde::{Deserialize, Serialize};
use crate::game::config::GameConfig;
use crate::game::input::InputIntent;

/// Complete state for the player vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Lateral offset from the road center
    pub x: f32,
    /// Forward speed (display units)
    pub speed: f32,
    /// Nitro reserve, 0-100
    pub nitro: f32,
    /// Whether nitro is actively boosting this frame
    pub is_nitro: bool,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            speed: 0.0,
            nitro: 100.0,
            is_nitro: false,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// What the drive step observed, for the audio reactor
#[derive(Debug, Clone, Copy)]
pub struct DriveFrame {
    /// Accelerate intent was held
    pub accelerating: bool,
    /// Nitro actually boosted this frame
    pub boosting: bool,
    /// Brake intent was held
    pub braking: bool,
    /// Speed before integration, for edge-triggered cues
    pub entry_speed: f32,
}

/// Vehicle simulation logic
pub struct Vehicle;

impl Vehicle {
    /// Advance the vehicle one frame.
    pub fn update(
        state: &mut PlayerState,
        config: &GameConfig,
        input: &InputIntent,
        dt: f32,
    ) -> DriveFrame {
        let scale = dt * 60.0;
        let entry_speed = state.speed;

        // Resolve target speed
        let mut target = 0.0;
        let mut accelerating = false;

        if input.accelerate {
            target = config.max_speed;
            accelerating = true;

            if input.nitro && state.nitro > 0.0 {
                target *= config.nitro_boost;
                state.nitro = (state.nitro - config.nitro_drain * scale).max(0.0);
                state.is_nitro = true;
            } else {
                state.is_nitro = false;
            }
        } else {
            state.is_nitro = false;
            if input.brake {
                target = config.brake_target;
            }
        }

        // Reserve refills whenever the nitro button is up
        if !input.nitro && state.nitro < 100.0 {
            state.nitro = (state.nitro + config.nitro_regen * scale).min(100.0);
        }

        // Chase the target; speed never goes negative, so the braking
        // target just steepens the approach to zero
        if state.speed < target {
            state.speed += config.acceleration * scale;
        } else {
            state.speed -= config.deceleration * scale;
        }
        state.speed = state.speed.max(0.0);

        // Steering authority grows with speed
        let turn = config.turn_rate * (state.speed / config.steer_reference_speed) * scale;
        if input.left {
            state.x += turn;
        }
        if input.right {
            state.x -= turn;
        }
        let limit = config.lateral_limit();
        state.x = state.x.clamp(-limit, limit);

        DriveFrame {
            accelerating,
            boosting: state.is_nitro,
            braking: input.brake,
            entry_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn cfg() -> GameConfig {
        GameConfig::championship()
    }

    fn held(accelerate: bool, brake: bool, nitro: bool) -> InputIntent {
        InputIntent {
            accelerate,
            brake,
            nitro,
            ..InputIntent::default()
        }
    }

    #[test]
    fn speed_and_nitro_stay_in_bounds() {
        let cfg = cfg();
        let mut state = PlayerState::new();
        let inputs = [
            held(true, false, true),
            held(false, true, false),
            held(false, false, false),
            held(true, true, true),
        ];

        for step in 0..4000 {
            let input = inputs[step % inputs.len()];
            Vehicle::update(&mut state, &cfg, &input, DT);
            assert!(state.speed >= 0.0, "speed went negative at step {step}");
            assert!((0.0..=100.0).contains(&state.nitro), "nitro out of range at step {step}");
        }
    }

    #[test]
    fn speed_approaches_max_under_full_throttle() {
        let cfg = cfg();
        let mut state = PlayerState::new();
        let input = held(true, false, false);

        for _ in 0..3000 {
            Vehicle::update(&mut state, &cfg, &input, DT);
        }
        // Settles just above max_speed: last step overshoots by at most
        // one acceleration increment before decel pulls it back
        assert!(state.speed > cfg.max_speed * 0.98);
        assert!(state.speed < cfg.max_speed + cfg.acceleration);
    }

    #[test]
    fn braking_decays_faster_than_coasting() {
        let cfg = cfg();
        let mut coasting = PlayerState::new();
        coasting.speed = 200.0;
        let mut braking = coasting.clone();

        Vehicle::update(&mut coasting, &cfg, &held(false, false, false), DT);
        Vehicle::update(&mut braking, &cfg, &held(false, true, false), DT);

        // Same decay formula; the negative target just keeps it applying
        // all the way down to zero
        assert_eq!(coasting.speed, braking.speed);

        for _ in 0..5000 {
            Vehicle::update(&mut braking, &cfg, &held(false, true, false), DT);
        }
        assert_eq!(braking.speed, 0.0);
    }

    #[test]
    fn nitro_drains_while_boosting_and_refills_when_released() {
        let cfg = cfg();
        let mut state = PlayerState::new();
        let boost = held(true, false, true);

        Vehicle::update(&mut state, &cfg, &boost, DT);
        assert!(state.nitro < 100.0);
        assert!(state.is_nitro);

        let before = state.nitro;
        Vehicle::update(&mut state, &cfg, &held(true, false, false), DT);
        assert!(state.nitro > before);
        assert!(!state.is_nitro);
    }

    #[test]
    fn nitro_never_drains_and_regens_in_the_same_frame() {
        let cfg = cfg();
        let mut state = PlayerState::new();
        state.nitro = 50.0;

        // Nitro held without throttle: no boost, no drain, and no regen
        // either since the button is down
        Vehicle::update(&mut state, &cfg, &held(false, false, true), DT);
        assert_eq!(state.nitro, 50.0);
        assert!(!state.is_nitro);
    }

    #[test]
    fn boost_shuts_off_when_the_reserve_empties() {
        let cfg = cfg();
        let mut state = PlayerState::new();
        let boost = held(true, false, true);

        let mut shutoff_seen = false;
        for _ in 0..20000 {
            Vehicle::update(&mut state, &cfg, &boost, DT);
            if state.nitro == 0.0 {
                // One more frame with an empty tank: flag must drop
                Vehicle::update(&mut state, &cfg, &boost, DT);
                assert!(!state.is_nitro);
                shutoff_seen = true;
                break;
            }
        }
        assert!(shutoff_seen, "reserve never emptied");
    }

    #[test]
    fn steering_is_clamped_to_the_road() {
        let cfg = cfg();
        let mut state = PlayerState::new();
        state.speed = cfg.max_speed;

        let left = InputIntent { left: true, accelerate: true, ..InputIntent::default() };
        for _ in 0..2000 {
            Vehicle::update(&mut state, &cfg, &left, DT);
        }
        assert_eq!(state.x, cfg.lateral_limit());

        let right = InputIntent { right: true, accelerate: true, ..InputIntent::default() };
        for _ in 0..4000 {
            Vehicle::update(&mut state, &cfg, &right, DT);
        }
        assert_eq!(state.x, -cfg.lateral_limit());
    }

    #[test]
    fn no_steering_while_stopped() {
        let cfg = cfg();
        let mut state = PlayerState::new();
        let left = InputIntent { left: true, ..InputIntent::default() };
        Vehicle::update(&mut state, &cfg, &left, DT);
        assert_eq!(state.x, 0.0);
    }
}
