//! Downscaling for the pattern pass

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::image_loader::PixelBuffer;

/// Dimensions scaled so the long edge is at most `max_dimension`
///
/// Aspect ratio is preserved and neither side drops below 1. Images already
/// within the limit keep their size.
pub fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge <= max_dimension || long_edge == 0 {
        return (width, height);
    }
    let scale = max_dimension as f64 / long_edge as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Downscale a buffer so its long edge is at most `max_dimension`
///
/// Returns an unscaled copy when the image is already small enough.
pub fn downscale_to(pixels: &PixelBuffer, max_dimension: u32) -> Result<PixelBuffer> {
    let (w, h) = fit_dimensions(pixels.width(), pixels.height(), max_dimension);
    if (w, h) == (pixels.width(), pixels.height()) {
        return Ok(pixels.clone());
    }

    // Borrowed view, the source bytes are not copied
    let view = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(pixels.width(), pixels.height(), pixels.as_bytes())
        .ok_or_else(|| AnalysisError::invalid("pixel_buffer", "dimensions do not match data"))?;
    let resized = imageops::resize(&view, w, h, FilterType::Triangle);

    debug!(
        from_width = pixels.width(),
        from_height = pixels.height(),
        to_width = w,
        to_height = h,
        "downscaled for pattern analysis"
    );
    Ok(resized.into())
}
