//! # Plant Scan
//!
//! A Rust crate for screening plant photographs for visible disease symptoms.
//!
//! This library provides a heuristic diagnosis by:
//! - Bucketing pixels into green, yellow, brown and white to grade leaf health
//! - Detecting lesion patterns (circular spots, irregular patches, streaks, powder)
//! - Classifying which plant part is shown (leaf, stem, tree, fruit, flower)
//! - Scoring a caller-supplied disease catalogue against those features
//! - Assembling a report with treatments, prevention tips and urgency
//!
//! ## Example
//!
//! ```rust,no_run
//! use plant_scan::{analyze_plant, KnowledgeBase};
//! use std::path::Path;
//!
//! let knowledge = KnowledgeBase::from_json_file(Path::new("catalogue.json"))?;
//! let report = analyze_plant(Path::new("leaf.jpg"), &knowledge)?;
//! println!(
//!     "{} ({:.0}%), urgency {:?}",
//!     report.primary_diagnosis.name, report.confidence, report.urgency
//! );
//! # Ok::<(), plant_scan::AnalysisError>(())
//! ```
//!
//! For reproducible output use [`PlantAnalyzer`] directly with [`NoJitter`]
//! or a seeded [`RngJitter`].

use std::path::Path;

pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod diagnosis;
pub mod error;
pub mod exif;
pub mod image_loader;
pub mod knowledge;
pub mod pipeline;
pub mod preprocess;

pub use color::{ColorAnalyzer, ColorFeatures, LeafHealth};
pub use config::AnalyzerConfig;
pub use detection::{PatternAnalyzer, PatternFeatures, PlantPartDetector, PlantPartEvidence};
pub use diagnosis::{
    DiagnosisReport, DiseaseScorer, FeatureBundle, JitterSource, NoJitter, ResultAssembler,
    RngJitter, ScoredCandidate, Urgency,
};
pub use error::{AnalysisError, Result};
pub use image_loader::{ImageDecoder, PixelBuffer, StandardDecoder};
pub use knowledge::{DiseaseRecord, KnowledgeBase, PlantPart, TreatmentRecord};
pub use pipeline::PlantAnalyzer;
pub use preprocess::{QualityReport, QualityWarning};

/// Analyze a plant photo with default settings
///
/// This is the main entry point. Scores vary slightly between calls because
/// the jitter is seeded from entropy.
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The image cannot be read or decoded
/// - No disease in `knowledge` affects the detected plant parts
pub fn analyze_plant(image_path: &Path, knowledge: &KnowledgeBase) -> Result<DiagnosisReport> {
    PlantAnalyzer::new().analyze_file(image_path, knowledge, &mut RngJitter::from_entropy())
}
