use std::time::Instant;

use image::RgbImage;

use crate::bank::store::KeyframeBank;
use crate::foundation::config::MosaicConfig;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::io::sink::FrameSink;
use crate::io::source::FrameSource;
use crate::render::mosaic::MosaicRenderer;
use crate::select::keyframes::{KeyframeSelector, SelectedFrame};

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames in the source sequence.
    pub frames_total: u64,
    /// Frames rendered and persisted by this call.
    pub frames_rendered: u64,
    /// Keyframes in the bank used for rendering.
    pub keyframes: u64,
}

/// Driver for one keyframe-mosaic run.
///
/// A session validates its configuration once, then runs the pipeline phases in order:
/// [`select_keyframes`](Self::select_keyframes), [`build_bank`](Self::build_bank) and
/// [`render_range`](Self::render_range). The bank is passed explicitly between phases, so no state
/// is shared behind the caller's back and rendering can be repeated against the same bank.
#[derive(Clone, Debug)]
pub struct MosaicSession {
    cfg: MosaicConfig,
    selector: KeyframeSelector,
    renderer: MosaicRenderer,
}

impl MosaicSession {
    /// Construct a session, validating `cfg`.
    pub fn new(cfg: MosaicConfig) -> MosaicResult<Self> {
        cfg.validate()?;
        let selector = KeyframeSelector::from_config(&cfg);
        let renderer = MosaicRenderer::from_config(&cfg)?;
        Ok(Self {
            cfg,
            selector,
            renderer,
        })
    }

    /// Configuration this session runs with.
    pub fn config(&self) -> &MosaicConfig {
        &self.cfg
    }

    /// Scan `source` for keyframes, persisting each one to `store` as it is picked.
    pub fn select_keyframes(
        &self,
        source: &dyn FrameSource,
        store: &mut dyn FrameSink,
    ) -> MosaicResult<Vec<SelectedFrame>> {
        self.selector.select_from_source(source, store)
    }

    /// Resize `keyframes` into the bank every render reads from.
    pub fn build_bank(&self, keyframes: &[SelectedFrame]) -> MosaicResult<KeyframeBank> {
        KeyframeBank::from_config(keyframes, &self.cfg)
    }

    /// Build the bank from already persisted keyframe images.
    pub fn build_bank_from_images(&self, images: &[RgbImage]) -> MosaicResult<KeyframeBank> {
        KeyframeBank::build_from_images(images, self.cfg.resolution, self.cfg.scale)
    }

    /// Render one frame against `bank`.
    pub fn render_frame(&self, frame: &RgbImage, bank: &KeyframeBank) -> MosaicResult<RgbImage> {
        self.renderer.render(frame, bank)
    }

    /// Render frames `start..source.len()` in order, persisting each under its source index.
    ///
    /// `start == source.len()` renders nothing; a larger `start` fails with
    /// [`MosaicError::OutOfRange`].
    #[tracing::instrument(skip_all, fields(start = start.0, frames = source.len()))]
    pub fn render_range(
        &self,
        source: &dyn FrameSource,
        bank: &KeyframeBank,
        start: FrameIndex,
        sink: &mut dyn FrameSink,
    ) -> MosaicResult<RenderStats> {
        let total = source.len() as u64;
        let range = FrameRange::new(start, FrameIndex(total))?;

        let mut stats = RenderStats {
            frames_total: total,
            frames_rendered: 0,
            keyframes: bank.len() as u64,
        };
        tracing::info!(
            from = range.start.0,
            to = range.end.0,
            keyframes = stats.keyframes,
            "rendering"
        );

        for idx in range.iter() {
            let frame = source.get(idx)?;
            let t0 = Instant::now();
            let out = self.renderer.render(&frame, bank)?;
            tracing::debug!(
                frame = idx.0,
                elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
                "rendered frame"
            );
            sink.persist(idx, &out)?;
            stats.frames_rendered += 1;
        }

        tracing::info!(rendered = stats.frames_rendered, "render complete");
        Ok(stats)
    }

    /// Select keyframes, build the bank and render `start..` in one call.
    pub fn run(
        &self,
        source: &dyn FrameSource,
        keyframe_store: &mut dyn FrameSink,
        output: &mut dyn FrameSink,
        start: FrameIndex,
    ) -> MosaicResult<RenderStats> {
        if start.0 > source.len() as u64 {
            return Err(MosaicError::out_of_range(start.as_usize(), source.len()));
        }
        let keyframes = self.select_keyframes(source, keyframe_store)?;
        let bank = self.build_bank(&keyframes)?;
        self.render_range(source, &bank, start, output)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/mosaic_session.rs"]
mod tests;
