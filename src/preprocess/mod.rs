//! Preparation of decoded pixels before feature extraction
//!
//! - [`resize`]: downscaling for the pattern pass
//! - [`quality`]: advisory exposure, contrast, size and coverage checks

pub mod quality;
pub mod resize;

pub use quality::{QualityAssessor, QualityReport, QualityWarning};
pub use resize::{downscale_to, fit_dimensions};
