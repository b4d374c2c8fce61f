use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbImage;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::MosaicResult;
use crate::io::decode::save_png;
use crate::io::source::list_pngs;

/// Durable destination for selected keyframes and rendered outputs.
///
/// The pipeline calls `persist` after each result is fully computed and propagates any error
/// unchanged; it never retries and never reads back what it persisted.
pub trait FrameSink {
    /// Record `image` under `index`.
    fn persist(&mut self, index: FrameIndex, image: &RgbImage) -> MosaicResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub(crate) frames: Vec<(FrameIndex, RgbImage)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the persisted frames, in persist order.
    pub fn frames(&self) -> &[(FrameIndex, RgbImage)] {
        &self.frames
    }

    /// Take ownership of the persisted images, dropping their indices.
    pub fn into_images(self) -> Vec<RgbImage> {
        self.frames.into_iter().map(|(_, img)| img).collect()
    }
}

impl FrameSink for InMemorySink {
    fn persist(&mut self, index: FrameIndex, image: &RgbImage) -> MosaicResult<()> {
        self.frames.push((index, image.clone()));
        Ok(())
    }
}

/// Writes `<prefix><index:04>.png` files into a directory.
#[derive(Clone, Debug)]
pub struct DirSink {
    dir: PathBuf,
    prefix: String,
}

impl DirSink {
    /// Sink writing into `dir`; the directory is created on first persist.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path `persist(index, ..)` writes to.
    pub fn path_for(&self, index: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}{}.png", self.prefix, pad(index.0, 4)))
    }

    /// Number of PNG files already present in the target directory.
    pub fn existing_count(&self) -> MosaicResult<usize> {
        Ok(list_pngs(&self.dir)?.len())
    }
}

impl FrameSink for DirSink {
    fn persist(&mut self, index: FrameIndex, image: &RgbImage) -> MosaicResult<()> {
        save_png(&self.path_for(index), image)
    }
}

/// Remove every `*.png` file directly inside `dir`. A missing directory is not an error.
pub fn clear_dir(dir: &Path) -> MosaicResult<usize> {
    let paths = list_pngs(dir)?;
    for path in &paths {
        std::fs::remove_file(path).with_context(|| format!("remove '{}'", path.display()))?;
    }
    tracing::info!(dir = %dir.display(), removed = paths.len(), "cleared directory");
    Ok(paths.len())
}

/// Left-pad `n` with zeros to at least `width` digits.
fn pad(n: u64, width: usize) -> String {
    format!("{n:0width$}")
}

#[cfg(test)]
#[path = "../../tests/unit/io/sink.rs"]
mod tests;
