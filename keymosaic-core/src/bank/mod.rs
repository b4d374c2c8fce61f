//! Dual-resolution keyframe cache.

/// Immutable keyframe bank built once per run.
pub mod store;
