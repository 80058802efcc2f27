//! Which plant organ a photo shows
//!
//! Counts green, brown, yellow and red pixels and maps the percentages to a
//! set of detected parts (leaf, stem, tree, fruit, flower) plus a dominant
//! part. The brown band here is wider than the color analyzer's so bark and
//! woody stems register.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::color::{exceeds_percent, percent_of};
use crate::constants::color::{GREEN_MIN, YELLOW_B_MAX, YELLOW_RG_MIN};
use crate::constants::plant_part::*;
use crate::image_loader::PixelBuffer;
use crate::knowledge::PlantPart;

/// Bucket percentages (0-100); they never sum above 100
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartPercentages {
    pub green: f32,
    pub brown: f32,
    pub yellow: f32,
    pub red: f32,
}

/// Plant part classification of one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantPartEvidence {
    /// Never empty; defaults to `{leaf}`
    pub detected_parts: BTreeSet<PlantPart>,
    /// Always a member of `detected_parts`
    pub dominant_part: PlantPart,
    /// Evidence strength, 70-95
    pub confidence: f32,
    pub characteristics: Vec<String>,
    pub percentages: PartPercentages,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlantPartDetector;

impl PlantPartDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, pixels: &PixelBuffer) -> PlantPartEvidence {
        let counts = measure(pixels);
        let percentages = counts.percentages();

        let mut detected = BTreeSet::new();
        let mut characteristics = Vec::new();

        if counts.over(counts.green, LEAF_GREEN_PERCENT) {
            detected.insert(PlantPart::Leaf);
            characteristics.push(format!(
                "Green foliage covers {:.1}% of the image",
                percentages.green
            ));
        }

        if counts.over(counts.brown, STEM_BROWN_PERCENT) {
            if counts.over(counts.brown, TREE_BROWN_PERCENT) {
                detected.insert(PlantPart::Tree);
                characteristics.push(format!(
                    "Extensive brown woody tissue ({:.1}%), likely bark or trunk",
                    percentages.brown
                ));
            } else {
                detected.insert(PlantPart::Stem);
                characteristics.push(format!("Brown stem tissue visible ({:.1}%)", percentages.brown));
            }
        }

        let colored_part = if counts.yellow >= counts.red {
            PlantPart::Fruit
        } else {
            PlantPart::Flower
        };
        if counts.over(counts.yellow, FRUIT_DETECT_PERCENT) || counts.over(counts.red, FRUIT_DETECT_PERCENT) {
            detected.insert(colored_part);
            characteristics.push(format!(
                "Yellow ({:.1}%) and red ({:.1}%) regions suggest {}",
                percentages.yellow, percentages.red, colored_part
            ));
        }

        if detected.is_empty() {
            detected.insert(PlantPart::Leaf);
            characteristics.push("No strong part evidence, assuming leaf".to_string());
        }

        let dominant_part = dominant_part(&counts, colored_part, &detected);
        let confidence = percent_of(counts.green + counts.brown + counts.yellow, counts.total)
            .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

        PlantPartEvidence {
            detected_parts: detected,
            dominant_part,
            confidence,
            characteristics,
            percentages,
        }
    }
}

/// Raw bucket counts; thresholds are checked on these, not on percentages
#[derive(Debug, Clone, Copy, Default)]
struct PartCounts {
    green: usize,
    brown: usize,
    yellow: usize,
    red: usize,
    total: usize,
}

impl PartCounts {
    fn over(&self, count: usize, percent: usize) -> bool {
        exceeds_percent(count, self.total, percent)
    }

    fn percentages(&self) -> PartPercentages {
        PartPercentages {
            green: percent_of(self.green, self.total),
            brown: percent_of(self.brown, self.total),
            yellow: percent_of(self.yellow, self.total),
            red: percent_of(self.red, self.total),
        }
    }
}

fn measure(pixels: &PixelBuffer) -> PartCounts {
    let mut counts = PartCounts {
        total: pixels.pixel_count(),
        ..PartCounts::default()
    };

    for px in pixels.pixels() {
        let (r, g, b) = (px[0], px[1], px[2]);
        if g > r && g > b && g > GREEN_MIN {
            counts.green += 1;
        } else if r > BROWN_R_RANGE.0
            && r < BROWN_R_RANGE.1
            && g > BROWN_G_RANGE.0
            && g < BROWN_G_RANGE.1
            && b < BROWN_B_MAX
        {
            counts.brown += 1;
        } else if r > YELLOW_RG_MIN && g > YELLOW_RG_MIN && b < YELLOW_B_MAX {
            counts.yellow += 1;
        } else if r > RED_R_MIN && g < RED_GB_MAX && b < RED_GB_MAX {
            counts.red += 1;
        }
    }
    counts
}

/// First match wins: tree, stem, fruit/flower, leaf
///
/// Falls back to the first detected part when the cascade lands outside the
/// detected set, so the result is always a member.
fn dominant_part(c: &PartCounts, colored_part: PlantPart, detected: &BTreeSet<PlantPart>) -> PlantPart {
    let cascade = if c.over(c.brown, TREE_BROWN_PERCENT) {
        PlantPart::Tree
    } else if c.over(c.brown, STEM_BROWN_PERCENT) {
        PlantPart::Stem
    } else if c.over(c.yellow, FRUIT_DOMINANT_PERCENT) || c.over(c.red, FRUIT_DOMINANT_PERCENT) {
        colored_part
    } else {
        PlantPart::Leaf
    };

    if detected.contains(&cascade) {
        cascade
    } else {
        detected.iter().next().copied().unwrap_or(PlantPart::Leaf)
    }
}
