use std::sync::Arc;

use image::RgbImage;
use rayon::prelude::*;

use crate::bank::store::KeyframeBank;
use crate::foundation::config::MosaicConfig;
use crate::foundation::core::Extent;
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::render::grid::{Cell, grid_cells};
use crate::render::matcher::TileMatcher;

/// Cell-matching parallelism for [`MosaicRenderer`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Match the cells of a frame on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl RenderThreading {
    /// Reject an explicit thread count of 0.
    pub fn validate(&self) -> MosaicResult<()> {
        if self.threads == Some(0) {
            return Err(MosaicError::validation(
                "threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Rebuilds frames as mosaics of keyframe regions.
///
/// Rendering is stateless across frames: the same frame and bank always give the same image,
/// and sequential and parallel matching give identical output.
#[derive(Clone, Debug)]
pub struct MosaicRenderer {
    resolution: u32,
    matcher: TileMatcher,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl MosaicRenderer {
    /// Sequential renderer for a `resolution × resolution` grid.
    pub fn new(resolution: u32, matcher: TileMatcher) -> MosaicResult<Self> {
        Self::with_threading(resolution, matcher, &RenderThreading::default())
    }

    /// Renderer for a `resolution × resolution` grid using `threading` for cell matching.
    pub fn with_threading(
        resolution: u32,
        matcher: TileMatcher,
        threading: &RenderThreading,
    ) -> MosaicResult<Self> {
        if resolution == 0 {
            return Err(MosaicError::validation("resolution must be >= 1"));
        }
        threading.validate()?;
        let pool = if threading.parallel {
            Some(Arc::new(build_thread_pool(threading.threads)?))
        } else {
            None
        };
        Ok(Self {
            resolution,
            matcher,
            pool,
        })
    }

    /// Renderer configured from `cfg.resolution`, `cfg.distance` and `cfg.threading`.
    pub fn from_config(cfg: &MosaicConfig) -> MosaicResult<Self> {
        Self::with_threading(
            cfg.resolution,
            TileMatcher::new(cfg.distance),
            &cfg.threading,
        )
    }

    /// Grid cells per axis.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Render `frame` as a mosaic of `bank`'s keyframes.
    ///
    /// The output is `scale` times the frame size and starts all black; each non-empty grid
    /// cell is overwritten with the matching region of the closest keyframe's render image.
    #[tracing::instrument(skip_all, fields(width = frame.width(), height = frame.height()))]
    pub fn render(&self, frame: &RgbImage, bank: &KeyframeBank) -> MosaicResult<RgbImage> {
        let extent = Extent::of(frame);
        let out_size = extent.scaled(bank.scale())?;
        let mut canvas = RgbImage::new(out_size.width, out_size.height);

        let cells: Vec<Cell> = grid_cells(extent, self.resolution, bank.step())
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect();

        let matches = match &self.pool {
            Some(pool) => pool.install(|| {
                cells
                    .par_iter()
                    .map(|cell| self.matcher.find_closest_in(frame, *cell, bank))
                    .collect::<MosaicResult<Vec<_>>>()
            })?,
            None => cells
                .iter()
                .map(|cell| self.matcher.find_closest_in(frame, *cell, bank))
                .collect::<MosaicResult<Vec<_>>>()?,
        };

        for (cell, index) in cells.iter().zip(matches) {
            let (_, render) = bank.lookup(index)?;
            composite_cell(&mut canvas, render, *cell, bank.scale());
        }
        Ok(canvas)
    }
}

/// Copy the top-left `cell × scale` region of `tile` into `canvas` at `cell`'s origin × `scale`.
///
/// The copy is clipped to the canvas and to the tile.
fn composite_cell(canvas: &mut RgbImage, tile: &RgbImage, cell: Cell, scale: u32) {
    let dx = cell.x * scale;
    let dy = cell.y * scale;
    let w = (cell.width * scale)
        .min(canvas.width().saturating_sub(dx))
        .min(tile.width()) as usize;
    let h = (cell.height * scale)
        .min(canvas.height().saturating_sub(dy))
        .min(tile.height()) as usize;
    if w == 0 || h == 0 {
        return;
    }

    let canvas_stride = canvas.width() as usize * 3;
    let tile_stride = tile.width() as usize * 3;
    let row_len = w * 3;
    let src: &[u8] = tile;
    let dst: &mut [u8] = canvas;
    for row in 0..h {
        let d = (dy as usize + row) * canvas_stride + dx as usize * 3;
        let s = row * tile_stride;
        dst[d..d + row_len].copy_from_slice(&src[s..s + row_len]);
    }
}

fn build_thread_pool(threads: Option<usize>) -> MosaicResult<rayon::ThreadPool> {
    let builder = match threads {
        Some(n) => rayon::ThreadPoolBuilder::new().num_threads(n),
        None => rayon::ThreadPoolBuilder::new(),
    };
    builder
        .build()
        .map_err(|e| MosaicError::Other(anyhow::anyhow!("build cell-matching pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/mosaic.rs"]
mod tests;
