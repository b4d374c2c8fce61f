//! Pixel distances and the sparse scene-change metric.

/// Sampled frame dissimilarity and per-pixel channel distances.
pub mod sample;
