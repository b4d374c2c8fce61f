use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::foundation::config::MosaicConfig;
use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::select::keyframes::SelectedFrame;

/// One keyframe, resized once to the bank's reference and render resolutions.
#[derive(Clone, Debug)]
pub struct Keyframe {
    source: FrameIndex,
    reference: RgbImage,
    render: RgbImage,
}

impl Keyframe {
    /// Position of the original frame in its source sequence.
    pub fn source(&self) -> FrameIndex {
        self.source
    }

    /// Matching copy, exactly one grid step in size.
    pub fn reference(&self) -> &RgbImage {
        &self.reference
    }

    /// Output copy, exactly `scale` times the reference size.
    pub fn render(&self) -> &RgbImage {
        &self.render
    }
}

/// Immutable, index-addressed collection of keyframes.
///
/// The grid step (`X_STEP`, `Y_STEP`) is derived from the first keyframe as
/// `ceil(cols / resolution)` by `ceil(rows / resolution)` and frozen. Every keyframe, whatever
/// its native size, is bilinearly resized to that step for matching and to `step * scale` for
/// output. The bank is never mutated after [`KeyframeBank::build`] returns, so it can be shared
/// freely between threads.
#[derive(Clone, Debug)]
pub struct KeyframeBank {
    step: Extent,
    scale: u32,
    keyframes: Vec<Keyframe>,
}

impl KeyframeBank {
    /// Resize `keyframes` into a bank for a `resolution × resolution` grid magnified by `scale`.
    #[tracing::instrument(skip(keyframes), fields(count = keyframes.len()))]
    pub fn build(keyframes: &[SelectedFrame], resolution: u32, scale: u32) -> MosaicResult<Self> {
        Self::build_from(
            keyframes.iter().map(|k| (k.index, &k.image)),
            resolution,
            scale,
        )
    }

    /// Like [`KeyframeBank::build`], with sizes taken from `cfg`.
    pub fn from_config(keyframes: &[SelectedFrame], cfg: &MosaicConfig) -> MosaicResult<Self> {
        Self::build(keyframes, cfg.resolution, cfg.scale)
    }

    /// Build from bare images (e.g. a keyframe cache on disk). Each image's position in
    /// `images` stands in for its source index.
    pub fn build_from_images(
        images: &[RgbImage],
        resolution: u32,
        scale: u32,
    ) -> MosaicResult<Self> {
        Self::build_from(
            images
                .iter()
                .enumerate()
                .map(|(i, img)| (FrameIndex(i as u64), img)),
            resolution,
            scale,
        )
    }

    fn build_from<'a>(
        keyframes: impl ExactSizeIterator<Item = (FrameIndex, &'a RgbImage)>,
        resolution: u32,
        scale: u32,
    ) -> MosaicResult<Self> {
        if resolution == 0 || scale == 0 {
            return Err(MosaicError::invalid_argument(
                "keyframe bank needs resolution >= 1 and scale >= 1",
            ));
        }

        let mut keyframes = keyframes.peekable();
        let first = keyframes
            .peek()
            .map(|(_, img)| Extent::of(img))
            .ok_or_else(|| MosaicError::empty_input("keyframe bank needs >= 1 keyframe"))?;
        let step = Extent::new(
            first.width.div_ceil(resolution),
            first.height.div_ceil(resolution),
        );
        let render_size = step.scaled(scale)?;

        let mut out = Vec::with_capacity(keyframes.len());
        for (source, img) in keyframes {
            if Extent::of(img).is_empty() {
                return Err(MosaicError::invalid_argument(format!(
                    "keyframe from frame {} has zero size",
                    source.0
                )));
            }
            out.push(Keyframe {
                source,
                reference: resize_bilinear(img, step),
                render: resize_bilinear(img, render_size),
            });
        }

        tracing::info!(keyframes = out.len(), step = %step, scale, "keyframes resized");
        Ok(Self {
            step,
            scale,
            keyframes: out,
        })
    }

    /// Reference and render images of keyframe `index`.
    pub fn lookup(&self, index: usize) -> MosaicResult<(&RgbImage, &RgbImage)> {
        let kf = self.get(index)?;
        Ok((&kf.reference, &kf.render))
    }

    /// Keyframe `index`.
    pub fn get(&self, index: usize) -> MosaicResult<&Keyframe> {
        self.keyframes
            .get(index)
            .ok_or_else(|| MosaicError::out_of_range(index, self.keyframes.len()))
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always false for a successfully built bank.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Grid step (`X_STEP`, `Y_STEP`), which is also the reference image size.
    pub fn step(&self) -> Extent {
        self.step
    }

    /// Render magnification.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Keyframes in selection order.
    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.keyframes.iter()
    }
}

fn resize_bilinear(img: &RgbImage, size: Extent) -> RgbImage {
    imageops::resize(img, size.width, size.height, FilterType::Triangle)
}

#[cfg(test)]
#[path = "../../tests/unit/bank/store.rs"]
mod tests;
