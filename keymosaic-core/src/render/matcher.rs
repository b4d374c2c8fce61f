use image::RgbImage;

use crate::bank::store::KeyframeBank;
use crate::foundation::core::Extent;
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::metric::sample::ChannelDistance;
use crate::render::grid::Cell;

/// Exhaustive nearest-keyframe search for one cell.
///
/// Every pixel of the cell is compared against the top-left region of the same size in each
/// keyframe's reference image. The keyframe with the strictly smallest total distance wins; ties
/// keep the earliest index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileMatcher {
    distance: ChannelDistance,
}

impl TileMatcher {
    /// Matcher summing `distance` over every covered pixel.
    pub fn new(distance: ChannelDistance) -> Self {
        Self { distance }
    }

    /// Per-pixel distance in use.
    pub fn distance(&self) -> ChannelDistance {
        self.distance
    }

    /// Index of the keyframe closest to `cell_pixels`, taken as a whole.
    pub fn find_closest(&self, cell_pixels: &RgbImage, bank: &KeyframeBank) -> MosaicResult<usize> {
        self.find_closest_in(cell_pixels, Cell::covering(Extent::of(cell_pixels)), bank)
    }

    /// Index of the keyframe closest to the `cell` region of `frame`, without copying it out.
    ///
    /// Fails with [`MosaicError::InvalidArgument`] when the cell leaves the frame or is larger
    /// than the bank's reference images.
    pub fn find_closest_in(
        &self,
        frame: &RgbImage,
        cell: Cell,
        bank: &KeyframeBank,
    ) -> MosaicResult<usize> {
        if !cell.fits_in(Extent::of(frame)) {
            return Err(MosaicError::invalid_argument(format!(
                "cell {cell:?} exceeds frame {}",
                Extent::of(frame)
            )));
        }
        if !bank.step().contains(cell.extent()) {
            return Err(MosaicError::invalid_argument(format!(
                "cell {} exceeds reference size {}",
                cell.extent(),
                bank.step()
            )));
        }

        let mut best_distance = cell.extent().area() * 255 * 3;
        let mut best_index = 0;
        for (i, kf) in bank.iter().enumerate() {
            let d = self.cell_distance(frame, cell, kf.reference(), best_distance);
            if d < best_distance {
                best_distance = d;
                best_index = i;
            }
        }
        Ok(best_index)
    }

    /// Sum of per-pixel distances between `cell` of `frame` and the top-left of `reference`.
    ///
    /// Stops as soon as the partial sum reaches `bound`: sums only grow, so such a candidate
    /// can no longer win.
    fn cell_distance(&self, frame: &RgbImage, cell: Cell, reference: &RgbImage, bound: u64) -> u64 {
        let frame_stride = frame.width() as usize * 3;
        let ref_stride = reference.width() as usize * 3;
        let row_len = cell.width as usize * 3;
        let frame_raw = frame.as_raw();
        let ref_raw = reference.as_raw();

        let mut total = 0u64;
        for row in 0..cell.height as usize {
            let f_start = (cell.y as usize + row) * frame_stride + cell.x as usize * 3;
            let r_start = row * ref_stride;
            let f_row = &frame_raw[f_start..f_start + row_len];
            let r_row = &ref_raw[r_start..r_start + row_len];

            for (f, r) in f_row.chunks_exact(3).zip(r_row.chunks_exact(3)) {
                let (f, r) = ([f[0], f[1], f[2]], [r[0], r[1], r[2]]);
                total += u64::from(self.distance.between_channels(r, f));
            }
            if total >= bound {
                break;
            }
        }
        total
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/matcher.rs"]
mod tests;
