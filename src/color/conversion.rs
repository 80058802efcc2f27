//! Color conversion utilities for reporting
//!
//! Turns quantized RGB triples into hex strings and coarse color names
//! ("green", "brown", ...) via HSV. The pixel buckets themselves work on raw
//! RGB thresholds and never go through here.

use palette::{FromColor, Hsv, Srgb};

/// RGB to HSV/hex/name helper
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert 8-bit RGB to HSV
    ///
    /// Returns (hue in degrees [0, 360), saturation [0, 1], value [0, 1]).
    pub fn rgb_to_hsv(&self, r: u8, g: u8, b: u8) -> (f32, f32, f32) {
        let srgb: Srgb<f32> = Srgb::new(r, g, b).into_format();
        let hsv = Hsv::from_color(srgb);
        (
            hsv.hue.into_positive_degrees(),
            hsv.saturation,
            hsv.value,
        )
    }

    /// Hex color string, e.g. "#28C828"
    pub fn to_hex(&self, r: u8, g: u8, b: u8) -> String {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Coarse human-readable color name
    pub fn color_name(&self, r: u8, g: u8, b: u8) -> &'static str {
        let (hue, saturation, value) = self.rgb_to_hsv(r, g, b);

        if value < 0.2 {
            return "black";
        }
        if saturation < 0.15 {
            return if value > 0.85 { "white" } else { "gray" };
        }

        if !(15.0..345.0).contains(&hue) {
            "red"
        } else if hue < 45.0 {
            if value < 0.65 {
                "brown"
            } else {
                "orange"
            }
        } else if hue < 70.0 {
            if value < 0.5 {
                "olive"
            } else {
                "yellow"
            }
        } else if hue < 170.0 {
            "green"
        } else if hue < 260.0 {
            "blue"
        } else {
            "purple"
        }
    }
}
