//! Rule-based disease scoring
//!
//! Every candidate starts at a base score and collects points for each
//! observed feature that agrees with its catalogue entry. A small jitter is
//! added before the score is clamped to [75, 95].

use serde::Serialize;
use tracing::debug;

use super::{FeatureBundle, JitterSource};
use crate::color::LeafHealth;
use crate::constants::scoring::*;
use crate::error::{AnalysisError, Result};
use crate::knowledge::{DiseaseCategory, DiseaseRecord, PlantPart};

/// A disease with its score and the evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub disease: DiseaseRecord,
    /// Confidence in [75, 95]
    pub score: f32,
    /// Matched rules, in evaluation order
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiseaseScorer;

impl DiseaseScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a single candidate against the extracted features
    pub fn score(
        &self,
        features: &FeatureBundle,
        disease: &DiseaseRecord,
        jitter: &mut dyn JitterSource,
    ) -> ScoredCandidate {
        let mut score = BASE_SCORE;
        let mut reasoning = Vec::new();

        let affected: Vec<PlantPart> = disease
            .affected_parts(&features.parts.detected_parts)
            .collect();
        if !affected.is_empty() {
            score += PART_MATCH;
            reasoning.push(format!("Affects {}", join_parts(&affected)));
        }

        let color = &features.color;
        if color.has_spots && disease.has_symptom_keyword("spot") {
            score += SPOT_SYMPTOM;
            reasoning.push("Visible spots match reported symptoms".to_string());
        }
        if color.leaf_health == LeafHealth::Yellowing && disease.has_symptom_keyword("yellow") {
            score += YELLOW_SYMPTOM;
            reasoning.push("Yellowing tissue matches reported symptoms".to_string());
        }
        if color.leaf_health == LeafHealth::Browning && disease.has_symptom_keyword("brown") {
            score += BROWN_SYMPTOM;
            reasoning.push("Browning tissue matches reported symptoms".to_string());
        }

        let pattern = &features.pattern;
        if pattern.has_circular_spots && disease.category == DiseaseCategory::Fungal {
            score += FUNGAL_CIRCULAR;
            reasoning.push("Circular lesions typical of fungal infection".to_string());
        }
        if pattern.has_irregular_patches && disease.category == DiseaseCategory::Bacterial {
            score += BACTERIAL_IRREGULAR;
            reasoning.push("Irregular patches typical of bacterial infection".to_string());
        }
        if pattern.has_powdery_texture && disease.name_contains("mildew") {
            score += MILDEW_POWDERY;
            reasoning.push("Powdery white coating consistent with mildew".to_string());
        }

        score += jitter.score_offset();

        ScoredCandidate {
            disease: disease.clone(),
            score: score.clamp(MIN_SCORE, MAX_SCORE),
            reasoning,
        }
    }

    /// Score all candidates and sort them best first
    ///
    /// Equal scores keep their catalogue order.
    ///
    /// # Errors
    ///
    /// `AnalysisError::NoCandidates` when `candidates` is empty.
    pub fn rank<'a, I>(
        &self,
        features: &FeatureBundle,
        candidates: I,
        jitter: &mut dyn JitterSource,
    ) -> Result<Vec<ScoredCandidate>>
    where
        I: IntoIterator<Item = &'a DiseaseRecord>,
    {
        let mut ranked: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|disease| self.score(features, disease, jitter))
            .collect();

        if ranked.is_empty() {
            return Err(AnalysisError::NoCandidates {
                detected_parts: features.parts.detected_parts.iter().copied().collect(),
            });
        }

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        for candidate in &ranked {
            debug!(
                disease = %candidate.disease.id,
                score = candidate.score,
                rules = candidate.reasoning.len(),
                "scored candidate"
            );
        }
        Ok(ranked)
    }
}

fn join_parts(parts: &[PlantPart]) -> String {
    parts
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::color::{ColorFeatures, ColorRatios};
    use crate::detection::{Assessment, PartPercentages, PatternFeatures, PlantPartEvidence};
    use crate::diagnosis::{NoJitter, RngJitter};
    use crate::knowledge::Severity;

    pub(crate) fn disease(
        id: &str,
        name: &str,
        category: DiseaseCategory,
        parts: &[PlantPart],
        symptoms: &[&str],
    ) -> DiseaseRecord {
        DiseaseRecord {
            id: id.into(),
            name: name.into(),
            scientific_name: format!("{} sp.", name),
            category,
            severity: Severity::Medium,
            plant_parts: parts.iter().copied().collect(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            causes: Vec::new(),
            economic_impact: 20.0,
        }
    }

    pub(crate) fn bundle(parts: &[PlantPart]) -> FeatureBundle {
        let detected: BTreeSet<PlantPart> = parts.iter().copied().collect();
        FeatureBundle {
            color: ColorFeatures {
                dominant_colors: Vec::new(),
                has_spots: false,
                spot_color_names: BTreeSet::new(),
                leaf_health: LeafHealth::Healthy,
                vegetation_percentage: 80.0,
                ratios: ColorRatios::default(),
            },
            pattern: PatternFeatures {
                has_circular_spots: false,
                has_irregular_patches: false,
                has_linear_patterns: false,
                has_powdery_texture: false,
                wilting_pattern: Assessment::NotEvaluated,
                edge_condition: Assessment::NotEvaluated,
            },
            parts: PlantPartEvidence {
                dominant_part: parts.first().copied().unwrap_or(PlantPart::Leaf),
                detected_parts: detected,
                confidence: 80.0,
                characteristics: Vec::new(),
                percentages: PartPercentages::default(),
            },
        }
    }

    #[test]
    fn test_part_match_only() {
        let scorer = DiseaseScorer::new();
        let d = disease("rust", "Leaf Rust", DiseaseCategory::Fungal, &[PlantPart::Leaf], &["orange pustules"]);
        let scored = scorer.score(&bundle(&[PlantPart::Leaf]), &d, &mut NoJitter);
        assert_eq!(scored.score, 75.0);
        assert_eq!(scored.reasoning, vec!["Affects leaf"]);
    }

    #[test]
    fn test_no_part_match_clamped_up() {
        let scorer = DiseaseScorer::new();
        let d = disease("canker", "Stem Canker", DiseaseCategory::Fungal, &[PlantPart::Stem], &[]);
        let scored = scorer.score(&bundle(&[PlantPart::Leaf]), &d, &mut NoJitter);
        assert_eq!(scored.score, MIN_SCORE);
        assert!(scored.reasoning.is_empty());
    }

    #[test]
    fn test_rules_accumulate_and_clamp() {
        let scorer = DiseaseScorer::new();
        let mut features = bundle(&[PlantPart::Leaf, PlantPart::Stem]);
        features.color.has_spots = true;
        features.color.leaf_health = LeafHealth::Yellowing;
        features.pattern.has_circular_spots = true;

        let d = disease(
            "septoria",
            "Septoria Leaf Spot",
            DiseaseCategory::Fungal,
            &[PlantPart::Leaf, PlantPart::Stem],
            &["Small circular SPOTS", "Yellow halo"],
        );
        let scored = scorer.score(&features, &d, &mut NoJitter);
        // 60 + 15 + 10 + 8 + 12 = 105
        assert_eq!(scored.score, MAX_SCORE);
        assert_eq!(scored.reasoning.len(), 4);
        assert_eq!(scored.reasoning[0], "Affects leaf, stem");
    }

    #[test]
    fn test_powdery_requires_mildew_name() {
        let scorer = DiseaseScorer::new();
        let mut features = bundle(&[PlantPart::Fruit]);
        features.pattern.has_powdery_texture = true;

        let mildew = disease("pm", "Powdery Mildew", DiseaseCategory::Fungal, &[PlantPart::Fruit], &[]);
        let blight = disease("eb", "Early Blight", DiseaseCategory::Fungal, &[PlantPart::Fruit], &[]);
        assert_eq!(scorer.score(&features, &mildew, &mut NoJitter).score, 90.0);
        assert_eq!(scorer.score(&features, &blight, &mut NoJitter).score, 75.0);
    }

    #[test]
    fn test_bacterial_irregular_patches() {
        let scorer = DiseaseScorer::new();
        let mut features = bundle(&[PlantPart::Leaf]);
        features.pattern.has_irregular_patches = true;
        features.color.leaf_health = LeafHealth::Browning;

        let d = disease(
            "blight",
            "Bacterial Blight",
            DiseaseCategory::Bacterial,
            &[PlantPart::Leaf],
            &["water-soaked brown lesions"],
        );
        // 60 + 15 + 8 + 10
        assert_eq!(scorer.score(&features, &d, &mut NoJitter).score, 93.0);
    }

    #[test]
    fn test_rank_sorted_descending_and_stable() {
        let scorer = DiseaseScorer::new();
        let mut features = bundle(&[PlantPart::Leaf]);
        features.pattern.has_powdery_texture = true;

        let catalogue = vec![
            disease("a", "Leaf Curl", DiseaseCategory::Viral, &[PlantPart::Leaf], &[]),
            disease("b", "Downy Mildew", DiseaseCategory::Fungal, &[PlantPart::Leaf], &[]),
            disease("c", "Mosaic", DiseaseCategory::Viral, &[PlantPart::Leaf], &[]),
        ];
        let ranked = scorer.rank(&features, &catalogue, &mut NoJitter).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|c| c.disease.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rank_empty_is_no_candidates() {
        let scorer = DiseaseScorer::new();
        let features = bundle(&[PlantPart::Leaf, PlantPart::Tree]);
        let err = scorer
            .rank(&features, Vec::<&DiseaseRecord>::new(), &mut NoJitter)
            .unwrap_err();
        match err {
            AnalysisError::NoCandidates { detected_parts } => {
                assert_eq!(detected_parts, vec![PlantPart::Leaf, PlantPart::Tree]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_jittered_scores_stay_in_bounds() {
        let scorer = DiseaseScorer::new();
        let mut features = bundle(&[PlantPart::Leaf]);
        features.color.has_spots = true;
        let d = disease("s", "Leaf Spot", DiseaseCategory::Fungal, &[PlantPart::Leaf], &["spots"]);

        let mut jitter = RngJitter::seeded(3);
        for _ in 0..200 {
            let score = scorer.score(&features, &d, &mut jitter).score;
            assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
        }
    }
}
