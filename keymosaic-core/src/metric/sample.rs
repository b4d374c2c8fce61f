use image::{Rgb, RgbImage};

use crate::foundation::core::Extent;

/// How the three channel deltas of a pixel pair collapse into one distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelDistance {
    /// `|Δr + Δg + Δb|`: signed deltas are summed before taking the absolute value, so
    /// opposite-signed channel changes cancel out.
    #[default]
    SignedSum,
    /// `|Δr| + |Δg| + |Δb|`: conventional per-channel absolute difference.
    AbsoluteSum,
}

impl ChannelDistance {
    /// Distance between two pixels, in `[0, 765]`.
    #[inline]
    pub fn between(self, a: &Rgb<u8>, b: &Rgb<u8>) -> u32 {
        self.between_channels(a.0, b.0)
    }

    /// [`ChannelDistance::between`] on raw `[r, g, b]` triples.
    #[inline]
    pub fn between_channels(self, a: [u8; 3], b: [u8; 3]) -> u32 {
        let dr = i32::from(b[0]) - i32::from(a[0]);
        let dg = i32::from(b[1]) - i32::from(a[1]);
        let db = i32::from(b[2]) - i32::from(a[2]);
        match self {
            Self::SignedSum => (dr + dg + db).unsigned_abs(),
            Self::AbsoluteSum => dr.unsigned_abs() + dg.unsigned_abs() + db.unsigned_abs(),
        }
    }
}

/// Cheap dissimilarity score between two equally sized images.
///
/// The score is taken over a fixed `density × density` grid of sample points instead of every
/// pixel, which keeps the cost independent of the frame resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleMetric {
    density: u32,
    distance: ChannelDistance,
}

impl Default for SampleMetric {
    fn default() -> Self {
        Self::new(30, ChannelDistance::SignedSum)
    }
}

impl SampleMetric {
    /// Metric sampling `density` points per axis.
    ///
    /// Configuration rejects a density of 0 in [`MosaicConfig::validate`]; metrics built
    /// directly clamp it to 1, which samples only the top-left pixel.
    ///
    /// [`MosaicConfig::validate`]: crate::MosaicConfig::validate
    pub fn new(density: u32, distance: ChannelDistance) -> Self {
        Self {
            density: density.max(1),
            distance,
        }
    }

    /// Per-axis sample count.
    pub fn density(&self) -> u32 {
        self.density
    }

    /// Channel distance applied at each sample.
    pub fn distance(&self) -> ChannelDistance {
        self.distance
    }

    /// Sampled distance normalized by `3 * density²`, so a full black-to-white change scores 255.
    ///
    /// Images of different dimensions score 0.
    pub fn compare(&self, a: &RgbImage, b: &RgbImage) -> f64 {
        let extent = Extent::of(a);
        if extent != Extent::of(b) || extent.is_empty() {
            return 0.0;
        }

        let d = u64::from(self.density);
        let cols = u64::from(extent.width);
        let rows = u64::from(extent.height);

        let mut accumulated = 0u64;
        for row in 0..d {
            let y = (row * rows / d) as u32;
            for col in 0..d {
                let x = (col * cols / d) as u32;
                let (pa, pb) = (a.get_pixel(x, y), b.get_pixel(x, y));
                accumulated += u64::from(self.distance.between(pa, pb));
            }
        }

        accumulated as f64 / self.normalizer()
    }

    /// `3 * density²`: channel count times sample count.
    fn normalizer(&self) -> f64 {
        let d = f64::from(self.density);
        3.0 * d * d
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metric/sample.rs"]
mod tests;
