//! Texture pattern and plant part detection
//!
//! Both detectors read a [`crate::PixelBuffer`] directly and keep no state
//! between images.

pub mod pattern;
pub mod plant_part;

pub use pattern::{Assessment, EdgeCondition, PatternAnalyzer, PatternCounts, PatternFeatures};
pub use plant_part::{PartPercentages, PlantPartDetector, PlantPartEvidence};
