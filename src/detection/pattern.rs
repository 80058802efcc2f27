//! Local texture patterns over a brightness map
//!
//! Four independent detectors, each a threshold on a count of local
//! neighborhoods:
//! - circular spots: dark center with a brighter ring around it
//! - irregular patches: high brightness variance in a 5x5 window
//! - linear streaks: long runs of dark pixels along a row
//! - powdery texture: white specks surrounded by darker tissue
//!
//! Wilting and leaf-edge condition are reported as not evaluated.
//!
//! Callers should downscale large photos first (see
//! [`crate::preprocess::downscale_to`]); every detector samples on a grid
//! sized for a ~200 px image.

use serde::{Deserialize, Serialize};

use crate::config::PatternConfig;
use crate::constants::pattern::*;
use crate::image_loader::PixelBuffer;

/// Result of a check that may not have been run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum Assessment<T> {
    Evaluated(T),
    NotEvaluated,
}

impl<T: Copy> Assessment<T> {
    pub fn evaluated(&self) -> Option<T> {
        match self {
            Assessment::Evaluated(v) => Some(*v),
            Assessment::NotEvaluated => None,
        }
    }

    pub fn value_or(&self, default: T) -> T {
        self.evaluated().unwrap_or(default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeCondition {
    Clean,
    Jagged,
    Burned,
}

/// Texture features of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFeatures {
    pub has_circular_spots: bool,
    pub has_irregular_patches: bool,
    pub has_linear_patterns: bool,
    pub has_powdery_texture: bool,
    pub wilting_pattern: Assessment<bool>,
    pub edge_condition: Assessment<EdgeCondition>,
}

impl PatternFeatures {
    /// Wilting flag, `false` while the check is not evaluated
    pub fn has_wilting_pattern(&self) -> bool {
        self.wilting_pattern.value_or(false)
    }

    /// Edge condition, `Clean` while the check is not evaluated
    pub fn edge_condition_or_clean(&self) -> EdgeCondition {
        self.edge_condition.value_or(EdgeCondition::Clean)
    }
}

/// Raw detector counts, kept for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCounts {
    pub circular_spots: usize,
    pub irregular_patches: usize,
    pub linear_rows: usize,
    pub powdery_specks: usize,
}

/// Row-major brightness map of an image
struct BrightnessMap {
    width: i32,
    height: i32,
    values: Vec<f32>,
}

impl BrightnessMap {
    fn from_pixels(pixels: &PixelBuffer) -> Self {
        let values = pixels
            .pixels()
            .map(|p| crate::image_loader::brightness(p[0], p[1], p[2]))
            .collect();
        Self {
            width: pixels.width() as i32,
            height: pixels.height() as i32,
            values,
        }
    }

    #[inline]
    fn at(&self, x: i32, y: i32) -> f32 {
        self.values[(y * self.width + x) as usize]
    }
}

/// Pattern analyzer with a configurable sampling grid
#[derive(Debug, Clone, Default)]
pub struct PatternAnalyzer {
    config: PatternConfig,
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PatternConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, pixels: &PixelBuffer) -> PatternFeatures {
        let counts = self.count(pixels);
        PatternFeatures {
            has_circular_spots: counts.circular_spots > CIRCULAR_SPOT_THRESHOLD,
            has_irregular_patches: counts.irregular_patches > IRREGULAR_PATCH_THRESHOLD,
            has_linear_patterns: counts.linear_rows > LINEAR_ROW_THRESHOLD,
            has_powdery_texture: counts.powdery_specks > POWDERY_THRESHOLD,
            wilting_pattern: Assessment::NotEvaluated,
            edge_condition: Assessment::NotEvaluated,
        }
    }

    /// Run every detector and return the raw counts
    pub fn count(&self, pixels: &PixelBuffer) -> PatternCounts {
        if pixels.is_empty() {
            return PatternCounts::default();
        }
        let map = BrightnessMap::from_pixels(pixels);
        PatternCounts {
            circular_spots: self.count_circular_spots(&map),
            irregular_patches: self.count_irregular_patches(&map),
            linear_rows: self.count_linear_rows(&map),
            powdery_specks: self.count_powdery_specks(pixels, &map),
        }
    }

    fn count_circular_spots(&self, map: &BrightnessMap) -> usize {
        // Outer radius of the ring; dx*dx + dy*dy < ANNULUS_OUTER_SQ needs |d| <= 3
        let reach = 3;
        let margin = reach + 1;
        let step = self.config.circular_step.max(1) as usize;
        let mut count = 0;

        for y in (margin..map.height - margin).step_by(step) {
            for x in (margin..map.width - margin).step_by(step) {
                let center = map.at(x, y);
                if center >= SPOT_CENTER_MAX_BRIGHTNESS {
                    continue;
                }

                let mut ring_sum = 0.0;
                let mut ring_len = 0u32;
                for dy in -reach..=reach {
                    for dx in -reach..=reach {
                        let d2 = dx * dx + dy * dy;
                        if (ANNULUS_INNER_SQ..ANNULUS_OUTER_SQ).contains(&d2) {
                            ring_sum += map.at(x + dx, y + dy);
                            ring_len += 1;
                        }
                    }
                }

                if ring_len > 0 && ring_sum / ring_len as f32 - center >= RING_CONTRAST {
                    count += 1;
                }
            }
        }
        count
    }

    fn count_irregular_patches(&self, map: &BrightnessMap) -> usize {
        let r = PATCH_RADIUS;
        let step = self.config.patch_step.max(1) as usize;
        let window = ((2 * r + 1) * (2 * r + 1)) as f32;
        let mut count = 0;

        for y in (r..map.height - r).step_by(step) {
            for x in (r..map.width - r).step_by(step) {
                let mut sum = 0.0;
                let mut sum_sq = 0.0;
                for dy in -r..=r {
                    for dx in -r..=r {
                        let v = map.at(x + dx, y + dy);
                        sum += v;
                        sum_sq += v * v;
                    }
                }
                let mean = sum / window;
                let variance = sum_sq / window - mean * mean;
                if variance > PATCH_VARIANCE {
                    count += 1;
                }
            }
        }
        count
    }

    fn count_linear_rows(&self, map: &BrightnessMap) -> usize {
        let step = self.config.line_row_step.max(1) as usize;

        (0..map.height)
            .step_by(step)
            .filter(|&y| {
                let mut run = 0;
                (0..map.width).any(|x| {
                    if map.at(x, y) < LINE_MAX_BRIGHTNESS {
                        run += 1;
                    } else {
                        run = 0;
                    }
                    run >= LINE_MIN_RUN
                })
            })
            .count()
    }

    fn count_powdery_specks(&self, pixels: &PixelBuffer, map: &BrightnessMap) -> usize {
        let step = self.config.powder_step.max(1) as usize;
        let mut count = 0;

        for y in (1..map.height - 1).step_by(step) {
            for x in (1..map.width - 1).step_by(step) {
                let [r, g, b] = pixels.rgb(x as u32, y as u32);
                if r <= POWDER_WHITE_MIN || g <= POWDER_WHITE_MIN || b <= POWDER_WHITE_MIN {
                    continue;
                }

                let mut dark = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if (dx, dy) != (0, 0)
                            && map.at(x + dx, y + dy) < POWDER_DARK_NEIGHBOR_BRIGHTNESS
                        {
                            dark += 1;
                        }
                    }
                }
                if dark >= POWDER_MIN_DARK_NEIGHBORS {
                    count += 1;
                }
            }
        }
        count
    }
}
