//! Core types and definitions for the flappy population simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! tunable constants and config, geometry, decision-function capability,
//! renderer snapshots, events, and error types.
//! It has no simulation logic and no dependency on any host framework.

pub mod config;
pub mod constants;
pub mod decision;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
