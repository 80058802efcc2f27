//! Disease scoring and report assembly
//!
//! Feature bundle × knowledge base → ranked candidates → report.

pub mod jitter;
pub mod report;
pub mod scoring;

use serde::{Deserialize, Serialize};

use crate::color::ColorFeatures;
use crate::detection::{PatternFeatures, PlantPartEvidence};

pub use jitter::{JitterSource, NoJitter, RngJitter};
pub use report::{
    AlternativeDiagnosis, Diagnosis, DiagnosisReport, EstimatedLoss, ResultAssembler,
    TreatmentRecommendation, Urgency,
};
pub use scoring::{DiseaseScorer, ScoredCandidate};

/// Everything the extractors learned about one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    pub color: ColorFeatures,
    pub pattern: PatternFeatures,
    pub parts: PlantPartEvidence,
}
