//! Externally tunable simulation parameters.
//!
//! `SimConfig` is the single source of physics, obstacle, and fitness
//! tuning for an episode. Every field defaults to the matching constant, so
//! a partial JSON document only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading or validating a `SimConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("wing frame period must be positive")]
    ZeroWingFrameTicks,
    #[error("agent start x {x} must lie on screen (0..={screen_width})")]
    AgentStartX { x: f64, screen_width: f64 },
    #[error("gap size must be positive, got {0}")]
    GapSize(f64),
    #[error("gap-top range {min}..{max} is empty")]
    EmptyGapRange { min: i32, max: i32 },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Logical ticks per second (frame cap for the host pump).
    pub tick_rate: u32,

    // --- World ---
    pub screen_width: f64,
    pub screen_height: f64,
    pub floor_y: f64,
    pub floor_clearance: f64,
    pub ceiling_y: f64,

    // --- Agent physics ---
    pub gravity: f64,
    pub jump_impulse: f64,
    pub terminal_velocity: f64,
    pub upward_arc_kick: f64,
    pub agent_start_x: f64,
    pub agent_start_y: f64,

    // --- Tilt / animation ---
    pub max_tilt: f64,
    pub tilt_step: f64,
    pub min_tilt: f64,
    pub tilt_hold_band: f64,
    pub nose_dive_tilt: f64,
    pub wing_frame_ticks: u32,

    // --- Obstacles ---
    pub obstacle_velocity: f64,
    pub gap_size: f64,
    pub gap_top_min: i32,
    pub gap_top_max: i32,
    pub first_obstacle_x: f64,

    // --- Fitness ---
    pub survival_reward: f64,
    pub pass_bonus: f64,
    pub collision_penalty: f64,
    /// Score above which evaluation is cut off. `None` runs until extinction.
    pub score_ceiling: Option<u32>,
    /// Fitness added to each survivor at the ceiling, if any.
    pub ceiling_fitness_bonus: Option<f64>,

    // --- Decisions ---
    pub jump_threshold: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            floor_y: FLOOR_Y,
            floor_clearance: FLOOR_CLEARANCE,
            ceiling_y: CEILING_Y,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            terminal_velocity: TERMINAL_VELOCITY,
            upward_arc_kick: UPWARD_ARC_KICK,
            agent_start_x: AGENT_START_X,
            agent_start_y: AGENT_START_Y,
            max_tilt: MAX_TILT,
            tilt_step: TILT_STEP,
            min_tilt: MIN_TILT,
            tilt_hold_band: TILT_HOLD_BAND,
            nose_dive_tilt: NOSE_DIVE_TILT,
            wing_frame_ticks: WING_FRAME_TICKS,
            obstacle_velocity: OBSTACLE_VELOCITY,
            gap_size: GAP_SIZE,
            gap_top_min: GAP_TOP_MIN,
            gap_top_max: GAP_TOP_MAX,
            first_obstacle_x: FIRST_OBSTACLE_X,
            survival_reward: SURVIVAL_REWARD,
            pass_bonus: PASS_BONUS,
            collision_penalty: COLLISION_PENALTY,
            score_ceiling: Some(SCORE_CEILING),
            ceiling_fitness_bonus: Some(CEILING_FITNESS_BONUS),
            jump_threshold: JUMP_THRESHOLD,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Reject tunables the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.wing_frame_ticks == 0 {
            return Err(ConfigError::ZeroWingFrameTicks);
        }
        if !(self.gap_size > 0.0 && self.gap_size.is_finite()) {
            return Err(ConfigError::GapSize(self.gap_size));
        }
        if self.gap_top_min >= self.gap_top_max {
            return Err(ConfigError::EmptyGapRange {
                min: self.gap_top_min,
                max: self.gap_top_max,
            });
        }
        for (name, value) in [
            ("obstacle_velocity", self.obstacle_velocity),
            ("terminal_velocity", self.terminal_velocity),
            ("screen_width", self.screen_width),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        // Agents behind x = 0 never pass the first obstacle before it retires.
        if !(0.0..=self.screen_width).contains(&self.agent_start_x) {
            return Err(ConfigError::AgentStartX {
                x: self.agent_start_x,
                screen_width: self.screen_width,
            });
        }
        for (name, value) in [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("jump_threshold", self.jump_threshold),
            ("nose_dive_tilt", self.nose_dive_tilt),
            ("survival_reward", self.survival_reward),
            ("pass_bonus", self.pass_bonus),
            ("collision_penalty", self.collision_penalty),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}
