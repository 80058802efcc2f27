//! Color feature extraction
//!
//! Pixel bucketing, quantized dominant colors and leaf health grading, plus
//! the HSV helpers used to name colors in reports.

pub mod analysis;
pub mod conversion;

pub use analysis::{ColorAnalyzer, ColorFeatures, ColorRatios, DominantColor, LeafHealth};
pub(crate) use analysis::{exceeds_percent, percent_of};
pub use conversion::ColorConverter;
