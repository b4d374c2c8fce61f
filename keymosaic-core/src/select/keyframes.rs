use image::RgbImage;

use crate::foundation::config::MosaicConfig;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::io::sink::FrameSink;
use crate::io::source::FrameSource;
use crate::metric::sample::SampleMetric;

/// A frame chosen as a keyframe, tagged with its position in the source sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFrame {
    /// Position in the source sequence.
    pub index: FrameIndex,
    /// Frame pixels.
    pub image: RgbImage,
}

/// Single-pass scene-change scan.
///
/// The first frame is always a keyframe. Every later frame is compared against the most recently
/// selected keyframe and selected when the score is strictly greater than the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyframeSelector {
    metric: SampleMetric,
    threshold: f64,
}

impl KeyframeSelector {
    /// Selector using `metric` and `threshold`.
    pub fn new(metric: SampleMetric, threshold: f64) -> Self {
        Self { metric, threshold }
    }

    /// Selector configured from `cfg.sampling_density`, `cfg.distance` and `cfg.threshold`.
    pub fn from_config(cfg: &MosaicConfig) -> Self {
        Self::new(
            SampleMetric::new(cfg.sampling_density, cfg.distance),
            cfg.threshold,
        )
    }

    /// Scene-change threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Metric used to score frame pairs.
    pub fn metric(&self) -> &SampleMetric {
        &self.metric
    }

    /// True when `candidate` differs enough from `last` to start a new keyframe.
    pub fn is_scene_change(&self, last: &RgbImage, candidate: &RgbImage) -> bool {
        self.metric.compare(last, candidate) > self.threshold
    }

    /// Indices of the keyframes in `frames`, in increasing order.
    #[tracing::instrument(skip_all, fields(frames = frames.len(), threshold = self.threshold))]
    pub fn select_indices(&self, frames: &[RgbImage]) -> MosaicResult<Vec<FrameIndex>> {
        let (first, rest) = frames
            .split_first()
            .ok_or_else(|| MosaicError::empty_input("keyframe selection needs >= 1 frame"))?;

        let mut selected = vec![FrameIndex(0)];
        let mut last = first;
        for (offset, frame) in rest.iter().enumerate() {
            if self.is_scene_change(last, frame) {
                selected.push(FrameIndex(offset as u64 + 1));
                last = frame;
            }
        }

        tracing::debug!(keyframes = selected.len(), "selected keyframes");
        Ok(selected)
    }

    /// Keyframes of `frames`, in source order.
    pub fn select(&self, frames: &[RgbImage]) -> MosaicResult<Vec<SelectedFrame>> {
        Ok(self
            .select_indices(frames)?
            .into_iter()
            .map(|index| SelectedFrame {
                index,
                image: frames[index.as_usize()].clone(),
            })
            .collect())
    }

    /// Stream the scan over `source`, persisting every keyframe to `store`.
    ///
    /// Keyframes are persisted under consecutive keyframe numbers (`0, 1, 2, ...`), not their
    /// source indices. Only the decision drives selection: a failing store aborts the scan with
    /// its error but never changes which frames count as keyframes.
    #[tracing::instrument(skip_all, fields(frames = source.len(), threshold = self.threshold))]
    pub fn select_from_source(
        &self,
        source: &dyn FrameSource,
        store: &mut dyn FrameSink,
    ) -> MosaicResult<Vec<SelectedFrame>> {
        if source.is_empty() {
            return Err(MosaicError::empty_input(
                "keyframe selection needs >= 1 frame",
            ));
        }

        let first = SelectedFrame {
            index: FrameIndex(0),
            image: source.get(FrameIndex(0))?,
        };
        store.persist(FrameIndex(0), &first.image)?;
        let mut selected = vec![first];

        for i in 1..source.len() as u64 {
            let frame = source.get(FrameIndex(i))?;
            let last = &selected[selected.len() - 1].image;
            if !self.is_scene_change(last, &frame) {
                continue;
            }

            store.persist(FrameIndex(selected.len() as u64), &frame)?;
            selected.push(SelectedFrame {
                index: FrameIndex(i),
                image: frame,
            });
            tracing::debug!(frame = i, keyframes = selected.len(), "picked keyframe");
        }

        tracing::info!(keyframes = selected.len(), "keyframes identified");
        Ok(selected)
    }
}

impl Default for KeyframeSelector {
    fn default() -> Self {
        Self::from_config(&MosaicConfig::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/select/keyframes.rs"]
mod tests;
