use crate::foundation::core::Extent;

/// Rectangular region of a frame. Edge cells are clipped to the frame, never padded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Cell {
    /// Construct a cell.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Cell covering all of `extent`.
    pub fn covering(extent: Extent) -> Self {
        Self::new(0, 0, extent.width, extent.height)
    }

    /// Size of the cell.
    pub fn extent(self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// True when the cell covers no pixels.
    pub fn is_empty(self) -> bool {
        self.extent().is_empty()
    }

    /// True when the cell lies entirely inside an image of size `frame`.
    pub fn fits_in(self, frame: Extent) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(frame.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(frame.height)
    }
}

/// Cells of a `resolution × resolution` grid over a frame of size `frame`, in row-major order.
///
/// The origin of cell `(gx, gy)` is `round(gx / resolution * cols)`,
/// `round(gy / resolution * rows)`; its size is `step` clipped at the right and bottom edges.
/// Geometry follows the frame's own dimensions while `step` comes from the keyframe bank, so
/// cells can overlap or leave gaps when the two disagree.
pub fn grid_cells(frame: Extent, resolution: u32, step: Extent) -> Vec<Cell> {
    let n = resolution as usize;
    let mut cells = Vec::with_capacity(n * n);
    for gy in 0..resolution {
        let y = grid_origin(gy, resolution, frame.height);
        let height = step.height.min(frame.height - y);
        for gx in 0..resolution {
            let x = grid_origin(gx, resolution, frame.width);
            let width = step.width.min(frame.width - x);
            cells.push(Cell::new(x, y, width, height));
        }
    }
    cells
}

fn grid_origin(g: u32, resolution: u32, len: u32) -> u32 {
    let origin = (f64::from(g) / f64::from(resolution) * f64::from(len)).round() as u32;
    origin.min(len)
}

#[cfg(test)]
#[path = "../../tests/unit/render/grid.rs"]
mod tests;
