//! Whole-image color statistics
//!
//! One linear pass over every pixel:
//! - buckets each pixel into green / yellow / brown / white (first match wins)
//! - accumulates a histogram of colors quantized to multiples of 32
//! - derives spot presence and a leaf health grade from the bucket ratios

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::color::ColorConverter;
use crate::constants::color::*;
use crate::image_loader::PixelBuffer;

/// Overall leaf condition from color ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafHealth {
    Healthy,
    Yellowing,
    Browning,
    Dying,
}

/// One entry of the quantized color histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Share of all pixels, 0-100
    pub percentage: f32,
    pub hex: String,
    pub name: String,
}

/// Bucket ratios (0-1) of the four pixel classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRatios {
    pub green: f32,
    pub yellow: f32,
    pub brown: f32,
    pub white: f32,
}

/// Color features of one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorFeatures {
    /// Up to five most frequent quantized colors, most frequent first
    pub dominant_colors: Vec<DominantColor>,
    pub has_spots: bool,
    pub spot_color_names: BTreeSet<String>,
    pub leaf_health: LeafHealth,
    /// Green-dominant pixels as percent of all pixels
    pub vegetation_percentage: f32,
    pub ratios: ColorRatios,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Green,
    Yellow,
    Brown,
    White,
}

fn classify(r: u8, g: u8, b: u8) -> Option<Bucket> {
    if g > r && g > b && g > GREEN_MIN {
        Some(Bucket::Green)
    } else if r > YELLOW_RG_MIN && g > YELLOW_RG_MIN && b < YELLOW_B_MAX {
        Some(Bucket::Yellow)
    } else if r > BROWN_R_RANGE.0
        && r < BROWN_R_RANGE.1
        && g > BROWN_G_RANGE.0
        && g < BROWN_G_RANGE.1
        && b < BROWN_B_MAX
    {
        Some(Bucket::Brown)
    } else if r > WHITE_MIN && g > WHITE_MIN && b > WHITE_MIN {
        Some(Bucket::White)
    } else {
        None
    }
}

#[inline]
fn quantize(channel: u8) -> u8 {
    (channel / QUANTIZATION_STEP) * QUANTIZATION_STEP
}

/// Whether `count` is strictly more than `percent`% of `total`
///
/// Exact integer comparison, so a share sitting on a cut never qualifies.
#[inline]
pub(crate) fn exceeds_percent(count: usize, total: usize, percent: usize) -> bool {
    count as u64 * 100 > percent as u64 * total as u64
}

/// `count` as a percentage of `total`, rounded once
#[inline]
pub(crate) fn percent_of(count: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 100.0 / total as f64) as f32
}

/// Pixel counts per bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BucketCounts {
    green: usize,
    yellow: usize,
    brown: usize,
    white: usize,
    total: usize,
}

impl BucketCounts {
    fn ratios(&self) -> ColorRatios {
        if self.total == 0 {
            return ColorRatios::default();
        }
        let total = self.total as f32;
        ColorRatios {
            green: self.green as f32 / total,
            yellow: self.yellow as f32 / total,
            brown: self.brown as f32 / total,
            white: self.white as f32 / total,
        }
    }

    /// First matching cut wins: yellowing, browning, dying, healthy
    fn leaf_health(&self) -> LeafHealth {
        if self.total == 0 {
            LeafHealth::Healthy
        } else if exceeds_percent(self.yellow, self.total, YELLOWING_PERCENT) {
            LeafHealth::Yellowing
        } else if exceeds_percent(self.brown, self.total, BROWNING_PERCENT) {
            LeafHealth::Browning
        } else if self.green as u64 * 100 < DYING_GREEN_PERCENT as u64 * self.total as u64 {
            LeafHealth::Dying
        } else {
            LeafHealth::Healthy
        }
    }

    fn spot_color_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if exceeds_percent(self.brown, self.total, SPOT_BROWN_PERCENT) {
            names.insert("brown".to_string());
        }
        if exceeds_percent(self.yellow, self.total, SPOT_YELLOW_PERCENT) {
            names.insert("yellow".to_string());
        }
        names
    }
}

/// Color analyzer over raw RGBA pixels
#[derive(Debug, Clone, Default)]
pub struct ColorAnalyzer {
    converter: ColorConverter,
}

impl ColorAnalyzer {
    pub fn new() -> Self {
        Self {
            converter: ColorConverter::new(),
        }
    }

    /// Extract color features from every pixel of the buffer
    ///
    /// An empty buffer yields zero ratios and `LeafHealth::Healthy`.
    pub fn analyze(&self, pixels: &PixelBuffer) -> ColorFeatures {
        let total = pixels.pixel_count();
        if total == 0 {
            return ColorFeatures {
                dominant_colors: Vec::new(),
                has_spots: false,
                spot_color_names: BTreeSet::new(),
                leaf_health: LeafHealth::Healthy,
                vegetation_percentage: 0.0,
                ratios: ColorRatios::default(),
            };
        }

        let mut counts = BucketCounts {
            total,
            ..BucketCounts::default()
        };
        let mut histogram: HashMap<[u8; 3], usize> = HashMap::new();

        for px in pixels.pixels() {
            let (r, g, b) = (px[0], px[1], px[2]);
            match classify(r, g, b) {
                Some(Bucket::Green) => counts.green += 1,
                Some(Bucket::Yellow) => counts.yellow += 1,
                Some(Bucket::Brown) => counts.brown += 1,
                Some(Bucket::White) => counts.white += 1,
                None => {}
            }
            *histogram
                .entry([quantize(r), quantize(g), quantize(b)])
                .or_insert(0) += 1;
        }

        let spot_color_names = counts.spot_color_names();
        ColorFeatures {
            dominant_colors: self.dominant_colors(histogram, total),
            has_spots: !spot_color_names.is_empty(),
            spot_color_names,
            leaf_health: counts.leaf_health(),
            vegetation_percentage: percent_of(counts.green, total).clamp(0.0, 100.0),
            ratios: counts.ratios(),
        }
    }

    /// Top quantized colors by count, ties broken by color value
    fn dominant_colors(&self, histogram: HashMap<[u8; 3], usize>, total: usize) -> Vec<DominantColor> {
        let mut entries: Vec<([u8; 3], usize)> = histogram.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        entries
            .into_iter()
            .take(DOMINANT_COLOR_COUNT)
            .map(|([r, g, b], count)| DominantColor {
                r,
                g,
                b,
                percentage: percent_of(count, total),
                hex: self.converter.to_hex(r, g, b),
                name: self.converter.color_name(r, g, b).to_string(),
            })
            .collect()
    }
}
