use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{MosaicError, MosaicResult};
use crate::metric::sample::ChannelDistance;
use crate::render::mosaic::RenderThreading;

/// Tunable parameters for one keyframe-mosaic run.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosaicConfig {
    /// Per-axis sample count of the scene-change metric.
    pub sampling_density: u32,
    /// Scene-change threshold; a frame becomes a keyframe when its score is strictly greater.
    pub threshold: f64,
    /// Grid cells per axis.
    pub resolution: u32,
    /// Output magnification relative to the input frame.
    pub scale: u32,
    /// Per-pixel channel distance used by both the metric and the tile matcher.
    pub distance: ChannelDistance,
    /// Cell matching parallelism.
    pub threading: RenderThreading,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            sampling_density: 30,
            threshold: 24.0,
            resolution: 18,
            scale: 2,
            distance: ChannelDistance::SignedSum,
            threading: RenderThreading::default(),
        }
    }
}

impl MosaicConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MosaicResult<Self> {
        let cfg: MosaicConfig = serde_json::from_reader(r)
            .map_err(|e| MosaicError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MosaicResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MosaicError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject parameter values the pipeline cannot run with.
    pub fn validate(&self) -> MosaicResult<()> {
        if self.sampling_density == 0 {
            return Err(MosaicError::validation("sampling_density must be >= 1"));
        }
        if self.resolution == 0 {
            return Err(MosaicError::validation("resolution must be >= 1"));
        }
        if self.scale == 0 {
            return Err(MosaicError::validation("scale must be >= 1"));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(MosaicError::validation(
                "threshold must be a finite, non-negative number",
            ));
        }
        self.threading.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
