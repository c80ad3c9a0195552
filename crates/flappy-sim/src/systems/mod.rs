//! Per-tick systems run by `Episode` in a fixed order.
//!
//! Systems are plain functions over the population and obstacle track.
//! They own no state; removals are reported back as per-row marks and
//! applied by the engine through `Population::prune`.

pub mod bounds;
pub mod collision;
pub mod flight;
pub mod scoring;
pub mod snapshot;
