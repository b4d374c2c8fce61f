//! Grid tiling, tile matching and mosaic compositing.
//!
//! A frame is cut into a `resolution × resolution` grid of cells. Each cell is matched against
//! every keyframe's reference image and replaced by the corresponding region of that keyframe's
//! render image, magnified by the bank's scale.

/// Grid geometry and cells.
pub mod grid;
/// Nearest-keyframe search for a single cell.
pub mod matcher;
/// Frame-level compositor.
pub mod mosaic;
