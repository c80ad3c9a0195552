//! Headless host for the flappy simulation.
//!
//! Drives episodes on a frame-pump thread and hands snapshots to whoever
//! is rendering or recording them.

pub mod game_loop;
pub mod state;

pub use flappy_core as core;
