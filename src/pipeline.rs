//! End-to-end analysis: bytes or pixels in, diagnosis report out
//!
//! Stages run in order on the calling thread:
//! 1. decode (skipped for [`PlantAnalyzer::analyze_pixels`])
//! 2. color analysis, plant part detection and quality checks on full resolution
//! 3. pattern analysis on a downscaled copy
//! 4. candidate selection, scoring and report assembly
//!
//! The pixel buffer is released once features are extracted; scoring only
//! sees the [`FeatureBundle`].

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::color::ColorAnalyzer;
use crate::config::AnalyzerConfig;
use crate::detection::{PatternAnalyzer, PlantPartDetector};
use crate::diagnosis::{
    DiagnosisReport, DiseaseScorer, FeatureBundle, JitterSource, ResultAssembler,
};
use crate::error::Result;
use crate::image_loader::{self, ImageDecoder, PixelBuffer, StandardDecoder};
use crate::knowledge::KnowledgeBase;
use crate::preprocess::{self, QualityAssessor, QualityReport};

/// Plant disease analyzer
///
/// Holds only configuration and stateless stage objects, so one instance can
/// be shared across threads. Randomness is supplied per call.
pub struct PlantAnalyzer {
    config: AnalyzerConfig,
    decoder: Box<dyn ImageDecoder>,
    color: ColorAnalyzer,
    pattern: PatternAnalyzer,
    parts: PlantPartDetector,
    quality: QualityAssessor,
    scorer: DiseaseScorer,
    assembler: ResultAssembler,
}

impl Default for PlantAnalyzer {
    fn default() -> Self {
        Self::from_valid_config(AnalyzerConfig::default())
    }
}

impl PlantAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an analyzer from a validated configuration
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: AnalyzerConfig) -> Self {
        Self {
            decoder: Box::new(StandardDecoder::with_exif_orientation(
                config.preprocessing.exif_correction,
            )),
            color: ColorAnalyzer::new(),
            pattern: PatternAnalyzer::with_config(config.pattern.clone()),
            parts: PlantPartDetector::new(),
            quality: QualityAssessor::new(config.quality.clone()),
            scorer: DiseaseScorer::new(),
            assembler: ResultAssembler::new(),
            config,
        }
    }

    /// Replace the image decoder
    pub fn with_decoder(mut self, decoder: Box<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Decode encoded image bytes and analyze them
    pub fn analyze_bytes(
        &self,
        bytes: &[u8],
        image_name: &str,
        knowledge: &KnowledgeBase,
        jitter: &mut dyn JitterSource,
    ) -> Result<DiagnosisReport> {
        let start = Instant::now();
        let pixels = self.decoder.decode(bytes)?;
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "decode stage");
        self.analyze_pixels(pixels, image_name, knowledge, jitter)
    }

    /// Read, decode and analyze an image file
    ///
    /// The report's image name is the file name.
    pub fn analyze_file(
        &self,
        path: &Path,
        knowledge: &KnowledgeBase,
        jitter: &mut dyn JitterSource,
    ) -> Result<DiagnosisReport> {
        let start = Instant::now();
        let pixels = image_loader::load_image(path, self.decoder.as_ref())?;
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "decode stage");

        let image_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.analyze_pixels(pixels, &image_name, knowledge, jitter)
    }

    /// Analyze an already decoded buffer
    pub fn analyze_pixels(
        &self,
        pixels: PixelBuffer,
        image_name: &str,
        knowledge: &KnowledgeBase,
        jitter: &mut dyn JitterSource,
    ) -> Result<DiagnosisReport> {
        info!(
            image = image_name,
            width = pixels.width(),
            height = pixels.height(),
            "analyzing plant image"
        );
        let (features, quality) = self.extract(pixels)?;
        self.diagnose(features, quality, image_name, knowledge, jitter)
    }

    /// Run every feature extractor, consuming the buffer
    pub fn extract(&self, pixels: PixelBuffer) -> Result<(FeatureBundle, QualityReport)> {
        let start = Instant::now();
        let color = self.color.analyze(&pixels);
        let parts = self.parts.detect(&pixels);
        let quality = self.quality.assess(&pixels, color.vegetation_percentage);
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            leaf_health = ?color.leaf_health,
            vegetation = color.vegetation_percentage,
            dominant_part = %parts.dominant_part,
            "color and part stage"
        );

        let start = Instant::now();
        let small =
            preprocess::downscale_to(&pixels, self.config.preprocessing.pattern_max_dimension)?;
        drop(pixels);
        let pattern = self.pattern.analyze(&small);
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            circular = pattern.has_circular_spots,
            irregular = pattern.has_irregular_patches,
            linear = pattern.has_linear_patterns,
            powdery = pattern.has_powdery_texture,
            "pattern stage"
        );

        Ok((
            FeatureBundle {
                color,
                pattern,
                parts,
            },
            quality,
        ))
    }

    /// Score the knowledge base against extracted features and build the report
    pub fn diagnose(
        &self,
        features: FeatureBundle,
        quality: QualityReport,
        image_name: &str,
        knowledge: &KnowledgeBase,
        jitter: &mut dyn JitterSource,
    ) -> Result<DiagnosisReport> {
        let start = Instant::now();
        let candidates = knowledge.candidates_for(
            &features.parts.detected_parts,
            self.config.selection.max_candidates,
        );
        debug!(candidates = candidates.len(), "selected disease candidates");

        let ranked = self.scorer.rank(&features, candidates, jitter)?;
        let category = ranked[0].disease.category;
        let treatments =
            knowledge.treatments_for(category, self.config.selection.max_treatments);

        let report = self.assembler.assemble(
            ranked,
            &treatments,
            features.parts,
            image_name,
            quality,
            jitter,
        )?;
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "scoring stage");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::{NoJitter, RngJitter, Urgency};
    use crate::error::AnalysisError;
    use crate::knowledge::PlantPart;

    const CATALOGUE: &str = r#"{
        "diseases": [
            {
                "id": "early-blight",
                "name": "Early Blight",
                "scientificName": "Alternaria solani",
                "category": "fungal",
                "severity": "high",
                "plantParts": ["leaf", "stem"],
                "symptoms": ["Brown concentric spots", "Yellowing around lesions"],
                "economicImpact": 30
            },
            {
                "id": "bark-canker",
                "name": "Bark Canker",
                "scientificName": "Cytospora sp.",
                "category": "fungal",
                "severity": "medium",
                "plantParts": ["tree"],
                "symptoms": ["Sunken brown bark lesions"],
                "economicImpact": 15
            },
            {
                "id": "fruit-rot",
                "name": "Fruit Rot",
                "scientificName": "Colletotrichum sp.",
                "category": "fungal",
                "severity": "low",
                "plantParts": ["fruit"],
                "symptoms": ["Soft sunken patches"],
                "economicImpact": 10
            }
        ],
        "treatments": [
            {
                "id": "mancozeb",
                "name": "Mancozeb 75% WP",
                "type": "chemical",
                "targetCategories": ["fungal"],
                "dosage": "2.5 g/L",
                "applicationMethod": "Foliar spray every 10 days",
                "cost": { "min": 300, "max": 500 },
                "effectiveness": 80,
                "safetyRating": "moderate"
            }
        ]
    }"#;

    fn knowledge() -> KnowledgeBase {
        KnowledgeBase::from_json_str(CATALOGUE).unwrap()
    }

    fn half_brown(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::filled(width, height, [40, 200, 40]);
        for y in 0..height {
            for x in 0..width / 2 {
                buf.set_rgb(x, y, [140, 90, 50]);
            }
        }
        buf
    }

    #[test]
    fn test_analyzer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlantAnalyzer>();
    }

    #[test]
    fn test_healthy_leaf_report() {
        let report = PlantAnalyzer::new()
            .analyze_pixels(
                PixelBuffer::filled(120, 120, [40, 200, 40]),
                "leaf.png",
                &knowledge(),
                &mut NoJitter,
            )
            .unwrap();

        assert_eq!(report.primary_diagnosis.disease_id, "early-blight");
        assert_eq!(report.confidence, 75.0);
        assert_eq!(report.urgency, Urgency::Immediate);
        assert!(report.expert_consultation);
        assert_eq!(report.treatments.len(), 1);
        assert_eq!(report.plant_parts.dominant_part, PlantPart::Leaf);
        assert!(report.alternative_diagnoses.is_empty());
    }

    #[test]
    fn test_half_brown_detects_tree() {
        let analyzer = PlantAnalyzer::new();
        let (features, _) = analyzer.extract(half_brown(120, 120)).unwrap();
        assert!(features.parts.detected_parts.contains(&PlantPart::Leaf));
        assert!(features.parts.detected_parts.contains(&PlantPart::Tree));
        assert_eq!(features.parts.dominant_part, PlantPart::Tree);

        let report = analyzer
            .diagnose(features, QualityReport::default(), "bark.png", &knowledge(), &mut NoJitter)
            .unwrap();
        assert_eq!(report.alternative_diagnoses.len(), 1);
        assert!(report.alternative_diagnoses[0].confidence < report.confidence);
    }

    #[test]
    fn test_no_matching_disease() {
        let kb = KnowledgeBase::new(Vec::new(), Vec::new());
        let err = PlantAnalyzer::new()
            .analyze_pixels(PixelBuffer::filled(10, 10, [40, 200, 40]), "x", &kb, &mut NoJitter)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoCandidates { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_small_image_gets_warning() {
        let report = PlantAnalyzer::new()
            .analyze_pixels(
                PixelBuffer::filled(20, 20, [40, 200, 40]),
                "tiny.png",
                &knowledge(),
                &mut NoJitter,
            )
            .unwrap();
        assert!(report
            .quality_warnings
            .iter()
            .any(|w| matches!(w, crate::preprocess::QualityWarning::TooSmall { .. })));
    }

    #[test]
    fn test_seeded_runs_match() {
        let analyzer = PlantAnalyzer::new();
        let kb = knowledge();
        let a = analyzer
            .analyze_pixels(half_brown(60, 60), "a", &kb, &mut RngJitter::seeded(9))
            .unwrap();
        let b = analyzer
            .analyze_pixels(half_brown(60, 60), "a", &kb, &mut RngJitter::seeded(9))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalyzerConfig::default();
        config.selection.max_candidates = 0;
        assert!(PlantAnalyzer::with_config(config).is_err());
    }

    #[test]
    fn test_decode_error_surfaces() {
        let err = PlantAnalyzer::new()
            .analyze_bytes(b"not an image", "x", &knowledge(), &mut NoJitter)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DecodeError { .. }));
    }
}
