//! Decision functions for flappy agents.
//!
//! Hand-written pilots for tests and demos, a feed-forward network
//! evaluator, and a population provider that hands networks to the
//! generation runner and keeps their fitness. Nothing here learns.

pub mod heuristic;
pub mod network;
pub mod roster;

pub use flappy_core as core;

#[cfg(test)]
mod tests;
