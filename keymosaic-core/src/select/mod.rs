//! Scene-change keyframe selection.

/// Threshold-driven keyframe scan.
pub mod keyframes;
