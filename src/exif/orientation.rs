//! EXIF orientation (tag 0x0112) reading and correction

use std::io::Cursor;

use image::DynamicImage;
use tracing::debug;

/// Orientation value meaning "already upright"
pub const ORIENTATION_NORMAL: u32 = 1;

/// Read the EXIF orientation from encoded image bytes
///
/// Returns [`ORIENTATION_NORMAL`] when the container has no EXIF block or no
/// orientation tag.
pub fn read_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(r) => r,
        Err(_) => return ORIENTATION_NORMAL,
    };

    reader
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(ORIENTATION_NORMAL)
}

/// Rotate/flip a decoded image according to an EXIF orientation value
///
/// Unknown values leave the image untouched.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    if orientation != ORIENTATION_NORMAL {
        debug!(orientation, "applying EXIF orientation");
    }
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn marked_image() -> DynamicImage {
        // 3x2 with a red marker in the top-left corner
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0, 128, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_no_exif_is_normal() {
        assert_eq!(read_orientation(b"not an image"), ORIENTATION_NORMAL);
        assert_eq!(read_orientation(&[]), ORIENTATION_NORMAL);
    }

    #[test]
    fn test_rotate_90_swaps_dimensions() {
        let rotated = apply_orientation(marked_image(), 6);
        assert_eq!(rotated.dimensions(), (2, 3));
        // Top-left moves to top-right under a clockwise quarter turn
        assert_eq!(rotated.get_pixel(1, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rotate_180_moves_marker() {
        let rotated = apply_orientation(marked_image(), 3);
        assert_eq!(rotated.dimensions(), (3, 2));
        assert_eq!(rotated.get_pixel(2, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_unknown_orientation_is_identity() {
        let img = apply_orientation(marked_image(), 42);
        assert_eq!(img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }
}
