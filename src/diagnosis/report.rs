//! Diagnosis report assembly
//!
//! Turns the ranked candidates and selected treatments into the report the
//! host application shows: primary and alternative diagnoses, treatments,
//! prevention tips, urgency, expected loss and follow-up actions.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{JitterSource, ScoredCandidate};
use crate::constants::report::*;
use crate::detection::PlantPartEvidence;
use crate::error::{AnalysisError, Result};
use crate::knowledge::{
    CostRange, DiseaseCategory, PlantPart, Severity, TreatmentRecord, TreatmentType,
};
use crate::preprocess::{QualityReport, QualityWarning};

/// How soon the grower should act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Immediate,
    Medium,
    Low,
}

impl From<Severity> for Urgency {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::High => Urgency::Immediate,
            Severity::Medium => Urgency::Medium,
            Severity::Low => Urgency::Low,
        }
    }
}

/// Best matching disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub disease_id: String,
    pub name: String,
    pub scientific_name: String,
    pub category: DiseaseCategory,
    pub severity: Severity,
    /// Parts the disease affects that were seen in the photo
    pub affected_parts: Vec<PlantPart>,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub confidence: f32,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeDiagnosis {
    pub disease_id: String,
    pub name: String,
    pub scientific_name: String,
    pub category: DiseaseCategory,
    pub confidence: f32,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecommendation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub treatment_type: TreatmentType,
    pub dosage: String,
    pub application_method: String,
    pub cost: CostRange,
    pub effectiveness: f32,
    pub safety_rating: String,
}

impl From<&TreatmentRecord> for TreatmentRecommendation {
    fn from(t: &TreatmentRecord) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            treatment_type: t.treatment_type.reported(),
            dosage: t.dosage.clone(),
            application_method: t.application_method.clone(),
            cost: t.cost.clone(),
            effectiveness: t.effectiveness,
            safety_rating: t.safety_rating.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedLoss {
    /// Typical yield loss in percent if untreated
    pub percentage: f32,
    pub description: String,
}

/// Complete analysis result for one photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisReport {
    pub image_name: String,
    pub primary_diagnosis: Diagnosis,
    pub alternative_diagnoses: Vec<AlternativeDiagnosis>,
    pub treatments: Vec<TreatmentRecommendation>,
    pub prevention_tips: Vec<String>,
    pub urgency: Urgency,
    pub estimated_loss: EstimatedLoss,
    pub follow_up_actions: Vec<String>,
    pub expert_consultation: bool,
    pub confidence: f32,
    pub plant_parts: PlantPartEvidence,
    pub quality_warnings: Vec<QualityWarning>,
    pub quality_suggestions: Vec<String>,
}

const GENERAL_PREVENTION: [&str; 3] = [
    "Use certified disease-free seed and planting material",
    "Rotate crops and remove plant debris after harvest",
    "Clean tools and equipment between fields",
];

const GENERAL_FOLLOW_UP: [&str; 3] = [
    "Remove and destroy visibly infected plant material",
    "Check neighbouring plants every 2-3 days for new symptoms",
    "Take a follow-up photo in 7 days to track progress",
];

fn category_prevention(category: DiseaseCategory) -> [&'static str; 2] {
    match category {
        DiseaseCategory::Fungal => [
            "Water at the base of plants and avoid wetting the foliage",
            "Improve air circulation with wider spacing and pruning",
        ],
        DiseaseCategory::Bacterial => [
            "Avoid handling plants while the foliage is wet",
            "Disinfect pruning tools between plants",
        ],
        DiseaseCategory::Viral => [
            "Control insect vectors such as aphids and whiteflies",
            "Pull out infected plants early to limit spread",
        ],
        DiseaseCategory::Pest => [
            "Inspect the underside of leaves weekly",
            "Encourage natural predators and use sticky traps",
        ],
        DiseaseCategory::Nutrient => [
            "Test the soil each season and fertilize to the results",
            "Keep soil pH in the range the crop prefers",
        ],
        DiseaseCategory::Environmental => [
            "Mulch to even out soil moisture and temperature",
            "Shield plants from heat, frost and waterlogging",
        ],
    }
}

fn loss_description(severity: Severity, percentage: f32) -> String {
    match severity {
        Severity::High => format!(
            "Up to {:.0}% yield loss expected without prompt treatment",
            percentage
        ),
        Severity::Medium => format!(
            "Up to {:.0}% yield loss possible if the infection spreads",
            percentage
        ),
        Severity::Low => format!("Minor impact, up to {:.0}% yield loss", percentage),
    }
}

/// Builds a [`DiagnosisReport`] from ranked candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble the report
    ///
    /// `ranked` must be sorted best first; the head becomes the primary
    /// diagnosis and up to two following entries become alternatives.
    /// `treatments` should already be filtered to the primary's category.
    ///
    /// # Errors
    ///
    /// `AnalysisError::NoCandidates` when `ranked` is empty.
    pub fn assemble(
        &self,
        ranked: Vec<ScoredCandidate>,
        treatments: &[&TreatmentRecord],
        plant_parts: PlantPartEvidence,
        image_name: &str,
        quality: QualityReport,
        jitter: &mut dyn JitterSource,
    ) -> Result<DiagnosisReport> {
        let mut ranked = ranked.into_iter();
        let primary = ranked.next().ok_or_else(|| AnalysisError::NoCandidates {
            detected_parts: plant_parts.detected_parts.iter().copied().collect(),
        })?;

        let confidence = primary.score;
        let disease = primary.disease;

        let alternative_diagnoses = ranked
            .take(MAX_ALTERNATIVES)
            .enumerate()
            .map(|(i, alt)| {
                let gap = jitter.alternative_gap();
                let alt_confidence =
                    (confidence - ALTERNATIVE_DROP - i as f32 * gap).max(ALTERNATIVE_FLOOR);
                AlternativeDiagnosis {
                    disease_id: alt.disease.id,
                    name: alt.disease.name,
                    scientific_name: alt.disease.scientific_name,
                    category: alt.disease.category,
                    confidence: alt_confidence,
                    reasoning: alt.reasoning,
                }
            })
            .collect();

        let treatments: Vec<TreatmentRecommendation> =
            treatments.iter().map(|t| TreatmentRecommendation::from(*t)).collect();

        let mut prevention_tips: Vec<String> = category_prevention(disease.category)
            .iter()
            .map(|s| s.to_string())
            .collect();
        prevention_tips.extend(GENERAL_PREVENTION.iter().map(|s| s.to_string()));

        let mut follow_up_actions: Vec<String> =
            GENERAL_FOLLOW_UP.iter().map(|s| s.to_string()).collect();
        follow_up_actions.push(match treatments.first() {
            Some(top) => format!("Apply {} as directed: {}", top.name, top.dosage),
            None => "Contact a local agricultural extension office for treatment options"
                .to_string(),
        });

        let expert_consultation =
            confidence < EXPERT_CONFIDENCE || disease.severity == Severity::High;

        let mut affected_parts: Vec<PlantPart> =
            disease.affected_parts(&plant_parts.detected_parts).collect();
        if affected_parts.is_empty() {
            affected_parts = disease.plant_parts.iter().copied().collect();
        }

        info!(
            image = image_name,
            disease = %disease.id,
            confidence,
            treatments = treatments.len(),
            "diagnosis assembled"
        );

        let quality_suggestions = quality.suggestions();
        Ok(DiagnosisReport {
            image_name: image_name.to_string(),
            urgency: disease.severity.into(),
            estimated_loss: EstimatedLoss {
                percentage: disease.economic_impact,
                description: loss_description(disease.severity, disease.economic_impact),
            },
            primary_diagnosis: Diagnosis {
                disease_id: disease.id,
                name: disease.name,
                scientific_name: disease.scientific_name,
                category: disease.category,
                severity: disease.severity,
                affected_parts,
                symptoms: disease.symptoms,
                causes: disease.causes,
                confidence,
                reasoning: primary.reasoning,
            },
            alternative_diagnoses,
            treatments,
            prevention_tips,
            follow_up_actions,
            expert_consultation,
            confidence,
            plant_parts,
            quality_warnings: quality.warnings,
            quality_suggestions,
        })
    }
}
