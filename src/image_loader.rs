//! Image decoding into raw RGBA pixel buffers
//!
//! The feature extractors only ever see a [`PixelBuffer`]: width, height and
//! a flat RGBA byte vector. Decoding sits behind the [`ImageDecoder`] trait so
//! a host can plug in its own codec.
//!
//! ## Supported Formats
//!
//! Via the `image` crate: JPEG, PNG, WebP, GIF (first frame), TIFF, BMP.
//!
//! EXIF orientation is applied by [`StandardDecoder`] when enabled, so phone
//! photos are scanned upright.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::exif;

/// Decoded image as flat RGBA bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap an RGBA byte vector; `data.len()` must equal `width * height * 4`
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AnalysisError::invalid(
                "pixel_buffer.len",
                format!("{} (expected {} for {}x{})", data.len(), expected, width, height),
            ));
        }
        Ok(Self { width, height, data })
    }

    /// Buffer filled with a single opaque color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixel = [rgb[0], rgb[1], rgb[2], 255];
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate pixels as `[r, g, b, a]` in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(4)
    }

    /// RGB of the pixel at (x, y); caller keeps coordinates in bounds
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Mean of the RGB channels at (x, y)
    #[inline]
    pub fn brightness(&self, x: u32, y: u32) -> f32 {
        let [r, g, b] = self.rgb(x, y);
        brightness(r, g, b)
    }

    /// Overwrite the RGB of one pixel, leaving alpha opaque
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl From<DynamicImage> for PixelBuffer {
    fn from(img: DynamicImage) -> Self {
        img.into_rgba8().into()
    }
}

/// Mean of three channels
#[inline]
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 + g as f32 + b as f32) / 3.0
}

/// Capability to turn encoded image bytes into pixels
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer>;
}

/// Decoder backed by the `image` crate with optional EXIF orientation fix
#[derive(Debug, Clone)]
pub struct StandardDecoder {
    apply_exif_orientation: bool,
}

impl Default for StandardDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardDecoder {
    pub fn new() -> Self {
        Self {
            apply_exif_orientation: true,
        }
    }

    pub fn with_exif_orientation(apply_exif_orientation: bool) -> Self {
        Self {
            apply_exif_orientation,
        }
    }
}

impl ImageDecoder for StandardDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        if bytes.is_empty() {
            return Err(AnalysisError::decode_msg("Image data is empty"));
        }

        let img = image::load_from_memory(bytes)
            .map_err(|e| AnalysisError::decode("Unsupported or corrupt image data", e))?;

        let img = if self.apply_exif_orientation {
            let orientation = exif::read_orientation(bytes);
            exif::apply_orientation(img, orientation)
        } else {
            img
        };

        debug!(width = img.width(), height = img.height(), "decoded image");
        Ok(img.into())
    }
}

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    /// First frame only
    Gif,
    Tiff,
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Read and decode an image file with the given decoder
///
/// # Errors
///
/// Returns `AnalysisError::DecodeError` if:
/// - The extension is not a supported image format
/// - The file cannot be read
/// - Decoding fails
pub fn load_image(path: &Path, decoder: &dyn ImageDecoder) -> Result<PixelBuffer> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| {
        AnalysisError::decode_msg(format!("Unknown image format for file: {}", path.display()))
    })?;

    let bytes = std::fs::read(path)
        .map_err(|e| AnalysisError::decode(format!("Failed to read {}", path.display()), e))?;

    debug!(?format, path = %path.display(), bytes = bytes.len(), "read image file");
    decoder.decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_extension(Path::new("leaf.jpg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("leaf.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("leaf.webp")),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_extension(Path::new("leaf.heic")), None);
        assert_eq!(ImageFormat::from_extension(Path::new("leaf")), None);
    }

    #[test]
    fn test_from_dynamic_image_converts_to_rgba() {
        let rgb = image::RgbImage::from_pixel(2, 3, image::Rgb([140, 90, 50]));
        let buf = PixelBuffer::from(DynamicImage::ImageRgb8(rgb));
        assert_eq!((buf.width(), buf.height()), (2, 3));
        assert_eq!(buf.as_bytes().len(), 2 * 3 * 4);
        assert_eq!(buf.rgb(1, 2), [140, 90, 50]);
        assert!(buf.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_load_image_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.PNG");
        let img = RgbaImage::from_pixel(5, 4, image::Rgba([40, 200, 40, 255]));
        std::fs::write(&path, encode_png(&img)).unwrap();

        let buf = load_image(&path, &StandardDecoder::new()).unwrap();
        assert_eq!((buf.width(), buf.height()), (5, 4));
    }

    #[test]
    fn test_pixel_buffer_length_checked() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { .. }));
        assert!(PixelBuffer::new(0, 0, vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_filled_buffer_and_access() {
        let mut buf = PixelBuffer::filled(3, 2, [10, 20, 30]);
        assert_eq!(buf.pixel_count(), 6);
        assert_eq!(buf.rgb(2, 1), [10, 20, 30]);
        assert!((buf.brightness(0, 0) - 20.0).abs() < 1e-6);

        buf.set_rgb(1, 1, [255, 0, 0]);
        assert_eq!(buf.rgb(1, 1), [255, 0, 0]);
        assert_eq!(buf.pixels().filter(|p| p[0] == 255).count(), 1);
        assert!(buf.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_decode_png_round_trip() {
        let img = RgbaImage::from_pixel(4, 3, image::Rgba([40, 200, 40, 255]));
        let decoded = StandardDecoder::new().decode(&encode_png(&img)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(decoded.rgb(3, 2), [40, 200, 40]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let decoder = StandardDecoder::new();
        assert!(matches!(
            decoder.decode(&[]),
            Err(AnalysisError::DecodeError { .. })
        ));
        assert!(matches!(
            decoder.decode(b"definitely not an image"),
            Err(AnalysisError::DecodeError { .. })
        ));
    }

    #[test]
    fn test_load_image_unknown_extension() {
        let err = load_image(Path::new("notes.txt"), &StandardDecoder::new()).unwrap_err();
        assert!(err.to_string().contains("Unknown image format"));
    }

    #[test]
    fn test_load_image_missing_file() {
        let err = load_image(Path::new("does_not_exist.png"), &StandardDecoder::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::DecodeError { .. }));
    }
}
