//! Simulation engine for the flappy population game.
//!
//! Owns agent physics, the obstacle track, and the population, runs the
//! per-tick systems in a fixed order, and produces `EpisodeSnapshot`s for
//! renderers and `EpisodeReport`s for the population provider.

pub mod engine;
pub mod error;
pub mod generation;
pub mod obstacle;
pub mod physics;
pub mod population;
pub mod replay;
pub mod silhouette;
pub mod systems;

pub use engine::{Episode, EpisodeSetup};
pub use error::EpisodeError;
pub use flappy_core as core;
