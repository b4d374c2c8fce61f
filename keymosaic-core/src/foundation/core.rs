use crate::foundation::error::{MosaicError, MosaicResult};

/// 0-based position of a frame in its source sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Index as `usize`, for addressing in-memory collections.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Half-open range of frame indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame (inclusive).
    pub start: FrameIndex,
    /// Last frame (exclusive).
    pub end: FrameIndex,
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> MosaicResult<Self> {
        if start.0 > end.0 {
            return Err(MosaicError::out_of_range(start.as_usize(), end.as_usize()));
        }
        Ok(Self { start, end })
    }

    /// Iterate the covered indices in order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Pixel dimensions of an image or region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Extent {
    /// Width in pixels (columns).
    pub width: u32,
    /// Height in pixels (rows).
    pub height: u32,
}

impl Extent {
    /// Construct an extent.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extent of an image buffer.
    pub fn of(img: &image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// True when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when `other` fits inside `self` in both dimensions.
    pub fn contains(self, other: Extent) -> bool {
        other.width <= self.width && other.height <= self.height
    }

    /// Both dimensions multiplied by `factor`; fails when either product overflows `u32`.
    pub fn scaled(self, factor: u32) -> MosaicResult<Self> {
        match (
            self.width.checked_mul(factor),
            self.height.checked_mul(factor),
        ) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(MosaicError::invalid_argument(format!(
                "{self} scaled by {factor} overflows u32"
            ))),
        }
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
