//! Per-agent vertical motion.
//!
//! Displacement is computed from the ticks elapsed since the last impulse,
//! not integrated from velocity, so a body's path depends only on its state
//! and the config. Tilt and wing frame are rendering state and never feed
//! back into position.

use flappy_core::config::SimConfig;
use flappy_core::types::Position;

/// Wing sprite sequence over one flap cycle.
const WING_CYCLE: [u8; 4] = [0, 1, 2, 1];

/// Vertical physics state of one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub x: f64,
    pub y: f64,
    /// Velocity set by the last impulse (0 before the first jump).
    pub velocity: f64,
    ticks_since_jump: u32,
    /// Height at the last jump; the body stays nose-up near it.
    jump_origin_y: f64,
    tilt: f64,
    wing_ticks: u32,
    wing_frame: u8,
}

impl PhysicsBody {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            ticks_since_jump: 0,
            jump_origin_y: y,
            tilt: 0.0,
            wing_ticks: 0,
            wing_frame: WING_CYCLE[0],
        }
    }

    /// Spawn at the configured start position.
    pub fn spawn(config: &SimConfig) -> Self {
        Self::new(config.agent_start_x, config.agent_start_y)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn ticks_since_jump(&self) -> u32 {
        self.ticks_since_jump
    }

    /// Rotation in degrees, positive = nose up.
    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    /// Apply the upward impulse and restart the arc.
    pub fn jump(&mut self, config: &SimConfig) {
        self.velocity = config.jump_impulse;
        self.ticks_since_jump = 0;
        self.jump_origin_y = self.y;
    }

    /// Displacement the body would move by after `ticks` ticks of its current arc.
    pub fn displacement_at(&self, ticks: u32, config: &SimConfig) -> f64 {
        let t = ticks as f64;
        let mut displacement = self.velocity * t + 0.5 * config.gravity * t * t;

        if displacement.abs() >= config.terminal_velocity {
            displacement = config.terminal_velocity.copysign(displacement);
        }
        if displacement < 0.0 {
            displacement -= config.upward_arc_kick;
        }
        displacement
    }

    /// Advance one tick. Returns the displacement applied.
    pub fn step(&mut self, config: &SimConfig) -> f64 {
        self.ticks_since_jump += 1;
        let displacement = self.displacement_at(self.ticks_since_jump, config);
        self.y += displacement;

        if displacement < 0.0 || self.y < self.jump_origin_y + config.tilt_hold_band {
            if self.tilt < config.max_tilt {
                self.tilt = config.max_tilt;
            }
        } else if self.tilt > config.min_tilt {
            self.tilt = (self.tilt - config.tilt_step).max(config.min_tilt);
        }

        self.advance_wing(config);
        displacement
    }

    /// Wing sprite index for the current tick.
    pub fn wing_frame(&self) -> u8 {
        self.wing_frame
    }

    fn advance_wing(&mut self, config: &SimConfig) {
        let period = config.wing_frame_ticks;
        if self.tilt <= config.nose_dive_tilt {
            // Wings held mid-flap while diving.
            self.wing_ticks = period * 2;
            self.wing_frame = WING_CYCLE[1];
            return;
        }
        self.wing_ticks = self.wing_ticks % (period * WING_CYCLE.len() as u32) + 1;
        let phase = (self.wing_ticks - 1) / period;
        self.wing_frame = WING_CYCLE[(phase as usize) % WING_CYCLE.len()];
    }
}
