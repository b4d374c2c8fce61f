use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbImage;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::io::decode::{is_png, load_rgb};

/// Stable, 0-based, random-access sequence of frames.
///
/// Implementations must return the same pixels for the same index for the lifetime of the
/// source, and fail with [`MosaicError::NotFound`] for indices `>= len()`.
pub trait FrameSource {
    /// Number of frames in the sequence.
    fn len(&self) -> usize;

    /// True when the sequence has no frames.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch frame `index`.
    fn get(&self, index: FrameIndex) -> MosaicResult<RgbImage>;
}

/// Frames already decoded into memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFrames {
    frames: Vec<RgbImage>,
}

impl InMemoryFrames {
    /// Wrap decoded frames, in sequence order.
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }

    /// Borrow the frames.
    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }
}

impl From<Vec<RgbImage>> for InMemoryFrames {
    fn from(frames: Vec<RgbImage>) -> Self {
        Self::new(frames)
    }
}

impl FrameSource for InMemoryFrames {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn get(&self, index: FrameIndex) -> MosaicResult<RgbImage> {
        self.frames
            .get(index.as_usize())
            .cloned()
            .ok_or(MosaicError::NotFound(index.0))
    }
}

/// PNG files of a directory, ordered by file name and decoded lazily on each `get`.
#[derive(Clone, Debug)]
pub struct DirFrameSource {
    dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl DirFrameSource {
    /// Enumerate the `*.png` files of `dir`. Subdirectories are ignored.
    pub fn open(dir: impl Into<PathBuf>) -> MosaicResult<Self> {
        let dir = dir.into();
        let paths = list_pngs(&dir)?;
        tracing::debug!(dir = %dir.display(), frames = paths.len(), "opened frame directory");
        Ok(Self { dir, paths })
    }

    /// Directory this source reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sorted file paths backing the sequence.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FrameSource for DirFrameSource {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn get(&self, index: FrameIndex) -> MosaicResult<RgbImage> {
        let path = self
            .paths
            .get(index.as_usize())
            .ok_or(MosaicError::NotFound(index.0))?;
        load_rgb(path)
    }
}

/// Sorted `*.png` paths directly inside `dir`. A missing directory lists as empty.
pub(crate) fn list_pngs(dir: &Path) -> MosaicResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read dir '{}'", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read dir entry in '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && is_png(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/io/source.rs"]
mod tests;
