use std::path::Path;

use anyhow::Context;
use image::RgbImage;

use crate::foundation::error::MosaicResult;

/// Decode encoded image bytes into 8-bit RGB, dropping any alpha channel.
pub fn decode_rgb(bytes: &[u8]) -> MosaicResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgb8())
}

/// Read and decode an image file into 8-bit RGB.
pub fn load_rgb(path: &Path) -> MosaicResult<RgbImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let dyn_img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(dyn_img.to_rgb8())
}

/// Encode `img` as PNG at `path`, creating parent directories as needed.
pub fn save_png(path: &Path, img: &RgbImage) -> MosaicResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// True when `path` has a `.png` extension (case-insensitive).
pub(crate) fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

#[cfg(test)]
#[path = "../../tests/unit/io/decode.rs"]
mod tests;
