//! Simulation constants and tuning parameters.
//!
//! These are the defaults behind `SimConfig`. The simulation reads tunables
//! through the config; only the sprite footprints below are read directly,
//! when building the default silhouettes.

/// Logical tick rate (Hz). The host frame pump caps at this rate.
pub const TICK_RATE: u32 = 100;

// --- World bounds (pixels, y grows downward) ---

/// Screen width; new obstacles spawn here.
pub const SCREEN_WIDTH: f64 = 600.0;

/// Screen height.
pub const SCREEN_HEIGHT: f64 = 800.0;

/// Floor line.
pub const FLOOR_Y: f64 = 730.0;

/// How far the agent silhouette may sink past the floor line before it counts as a floor hit.
pub const FLOOR_CLEARANCE: f64 = 10.0;

/// Agents above this line have left the screen.
pub const CEILING_Y: f64 = -50.0;

// --- Agent physics ---

/// Downward acceleration (units/tick²).
pub const GRAVITY: f64 = 3.0;

/// Velocity set by a jump (negative = upward).
pub const JUMP_IMPULSE: f64 = -10.5;

/// Maximum per-tick displacement magnitude.
pub const TERMINAL_VELOCITY: f64 = 16.0;

/// Extra upward displacement applied while rising.
pub const UPWARD_ARC_KICK: f64 = 2.0;

/// Agent spawn x. All agents share it.
pub const AGENT_START_X: f64 = 230.0;

/// Agent spawn y.
pub const AGENT_START_Y: f64 = 350.0;

// --- Tilt / animation (rendering only) ---

/// Nose-up tilt in degrees.
pub const MAX_TILT: f64 = 25.0;

/// Nose-down rotation per tick in degrees.
pub const TILT_STEP: f64 = 20.0;

/// Lowest tilt in degrees (straight down).
pub const MIN_TILT: f64 = -90.0;

/// Agents stay nose-up while within this many units below their last jump height.
pub const TILT_HOLD_BAND: f64 = 50.0;

/// Tilt at or below which the wing animation freezes.
pub const NOSE_DIVE_TILT: f64 = -80.0;

/// Ticks per wing animation frame.
pub const WING_FRAME_TICKS: u32 = 5;

// --- Obstacles ---

/// Horizontal obstacle speed (units/tick).
pub const OBSTACLE_VELOCITY: f64 = 5.0;

/// Vertical size of the gap an agent flies through.
pub const GAP_SIZE: f64 = 160.0;

/// Lowest gap-top y (inclusive).
pub const GAP_TOP_MIN: i32 = 50;

/// Highest gap-top y (exclusive).
pub const GAP_TOP_MAX: i32 = 450;

/// X position of the first obstacle of every episode.
pub const FIRST_OBSTACLE_X: f64 = 700.0;

// --- Silhouettes (pixel footprints of the 2x-scaled sprites) ---

/// Agent sprite width.
pub const AGENT_WIDTH: u32 = 68;

/// Agent sprite height.
pub const AGENT_HEIGHT: u32 = 48;

/// Pipe sprite width.
pub const PIPE_WIDTH: u32 = 104;

/// Pipe sprite height.
pub const PIPE_HEIGHT: u32 = 640;

/// Rows of the full-width pipe cap.
pub const PIPE_CAP_HEIGHT: u32 = 48;

/// Columns trimmed from each side of the pipe body below the cap.
pub const PIPE_BODY_INSET: u32 = 4;

// --- Fitness ---

/// Fitness granted to every surviving agent each tick.
pub const SURVIVAL_REWARD: f64 = 0.1;

/// Fitness granted to every surviving agent when an obstacle is passed.
pub const PASS_BONUS: f64 = 5.0;

/// Fitness removed from an agent that hits an obstacle.
pub const COLLISION_PENALTY: f64 = 1.0;

/// Score above which an evaluation episode is cut off.
pub const SCORE_CEILING: u32 = 150;

/// Fitness granted to each agent still alive at the score ceiling.
pub const CEILING_FITNESS_BONUS: f64 = 1000.0;

// --- Decisions ---

/// Number of sensor inputs fed to each decision function.
pub const INPUT_COUNT: usize = 3;

/// Output[0] strictly above this value triggers a jump.
pub const JUMP_THRESHOLD: f64 = 0.5;
