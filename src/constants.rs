//! Fixed thresholds for the pixel heuristics and scoring rules
//!
//! Tunable limits (grid steps, selection sizes, quality limits) live in
//! [`crate::config`]; the values here define the heuristics themselves.

/// Color bucket thresholds used by the color analyzer
pub mod color {
    /// Minimum green channel for a green-dominant pixel
    pub const GREEN_MIN: u8 = 60;

    /// Yellow pixel: red and green above, blue below
    pub const YELLOW_RG_MIN: u8 = 180;
    pub const YELLOW_B_MAX: u8 = 100;

    /// Brown pixel band (exclusive bounds)
    pub const BROWN_R_RANGE: (u8, u8) = (100, 160);
    pub const BROWN_G_RANGE: (u8, u8) = (60, 120);
    pub const BROWN_B_MAX: u8 = 80;

    /// White pixel: all channels above
    pub const WHITE_MIN: u8 = 200;

    /// Histogram quantization step per channel
    pub const QUANTIZATION_STEP: u8 = 32;

    /// Number of dominant colors reported
    pub const DOMINANT_COLOR_COUNT: usize = 5;

    /// Spot detection shares, percent of all pixels
    pub const SPOT_BROWN_PERCENT: usize = 5;
    pub const SPOT_YELLOW_PERCENT: usize = 10;

    /// Leaf health cascade shares, percent of all pixels
    pub const YELLOWING_PERCENT: usize = 20;
    pub const BROWNING_PERCENT: usize = 15;
    pub const DYING_GREEN_PERCENT: usize = 30;
}

/// Pattern detector thresholds
///
/// Each `*_THRESHOLD` count must be exceeded for the pattern to be reported.
pub mod pattern {
    /// Dark center brightness for circular spot candidates
    pub const SPOT_CENTER_MAX_BRIGHTNESS: f32 = 100.0;
    /// Annulus squared radius bounds [inner, outer)
    pub const ANNULUS_INNER_SQ: i32 = 4;
    pub const ANNULUS_OUTER_SQ: i32 = 16;
    /// Required brightness lift from center to ring
    pub const RING_CONTRAST: f32 = 30.0;
    pub const CIRCULAR_SPOT_THRESHOLD: usize = 5;

    /// 5x5 neighborhood brightness variance for irregular patches
    pub const PATCH_VARIANCE: f32 = 800.0;
    pub const PATCH_RADIUS: i32 = 2;
    pub const IRREGULAR_PATCH_THRESHOLD: usize = 10;

    /// Dark run brightness and minimum length for linear streaks
    pub const LINE_MAX_BRIGHTNESS: f32 = 80.0;
    pub const LINE_MIN_RUN: usize = 8;
    pub const LINEAR_ROW_THRESHOLD: usize = 3;

    /// Powdery texture: white speck with a dark surrounding
    pub const POWDER_WHITE_MIN: u8 = 180;
    pub const POWDER_DARK_NEIGHBOR_BRIGHTNESS: f32 = 140.0;
    pub const POWDER_MIN_DARK_NEIGHBORS: usize = 5;
    pub const POWDERY_THRESHOLD: usize = 15;
}

/// Plant part detector thresholds
///
/// The `*_PERCENT` cuts are whole percentages of all pixels and are compared
/// against exact pixel counts.
pub mod plant_part {
    /// Brown band for bark and stems, wider than the color analyzer's
    pub const BROWN_R_RANGE: (u8, u8) = (100, 180);
    pub const BROWN_G_RANGE: (u8, u8) = (60, 140);
    pub const BROWN_B_MAX: u8 = 100;

    /// Red pixel: strong red, weak green and blue
    pub const RED_R_MIN: u8 = 150;
    pub const RED_GB_MAX: u8 = 100;

    pub const LEAF_GREEN_PERCENT: usize = 30;
    pub const STEM_BROWN_PERCENT: usize = 15;
    pub const TREE_BROWN_PERCENT: usize = 40;
    pub const FRUIT_DETECT_PERCENT: usize = 10;
    pub const FRUIT_DOMINANT_PERCENT: usize = 15;

    /// Evidence confidence floor and ceiling
    pub const MIN_CONFIDENCE: f32 = 70.0;
    pub const MAX_CONFIDENCE: f32 = 95.0;
}

/// Disease scoring weights
pub mod scoring {
    pub const BASE_SCORE: f32 = 60.0;
    pub const PART_MATCH: f32 = 15.0;
    pub const SPOT_SYMPTOM: f32 = 10.0;
    pub const YELLOW_SYMPTOM: f32 = 8.0;
    pub const BROWN_SYMPTOM: f32 = 8.0;
    pub const FUNGAL_CIRCULAR: f32 = 12.0;
    pub const BACTERIAL_IRREGULAR: f32 = 10.0;
    pub const MILDEW_POWDERY: f32 = 15.0;

    /// Jitter bounds for a candidate score
    pub const JITTER_RANGE: (f32, f32) = (-5.0, 5.0);

    /// Final score clamp
    pub const MIN_SCORE: f32 = 75.0;
    pub const MAX_SCORE: f32 = 95.0;
}

/// Report assembly limits
pub mod report {
    /// Alternatives never report a confidence below this
    pub const ALTERNATIVE_FLOOR: f32 = 60.0;
    /// Fixed drop from the primary confidence for the first alternative
    pub const ALTERNATIVE_DROP: f32 = 10.0;
    /// Additional per-rank drop range
    pub const ALTERNATIVE_GAP_RANGE: (f32, f32) = (10.0, 15.0);
    pub const MAX_ALTERNATIVES: usize = 2;

    /// Below this confidence an expert should confirm the diagnosis
    pub const EXPERT_CONFIDENCE: f32 = 75.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brown_bands_nest() {
        // The part detector's brown band must contain the color analyzer's
        assert!(plant_part::BROWN_R_RANGE.0 <= color::BROWN_R_RANGE.0);
        assert!(plant_part::BROWN_R_RANGE.1 >= color::BROWN_R_RANGE.1);
        assert!(plant_part::BROWN_G_RANGE.1 >= color::BROWN_G_RANGE.1);
        assert!(plant_part::BROWN_B_MAX >= color::BROWN_B_MAX);
    }

    #[test]
    fn test_score_ranges() {
        assert!(scoring::MIN_SCORE < scoring::MAX_SCORE);
        assert!(scoring::JITTER_RANGE.0 < scoring::JITTER_RANGE.1);
        assert!(report::ALTERNATIVE_FLOOR < scoring::MIN_SCORE);
        assert!(plant_part::STEM_BROWN_PERCENT < plant_part::TREE_BROWN_PERCENT);
    }

    #[test]
    fn test_annulus_is_ring() {
        assert!(pattern::ANNULUS_INNER_SQ < pattern::ANNULUS_OUTER_SQ);
        let max_radius = (pattern::ANNULUS_OUTER_SQ as f32).sqrt() as i32;
        assert_eq!(max_radius, 4);
    }
}
