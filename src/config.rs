//! Configuration for the plant analysis pipeline.
//!
//! Tunable parameters are grouped by stage. The heuristic thresholds that
//! define the detectors themselves are fixed in [`crate::constants`].
//!
//! # Configuration Loading
//!
//! ```no_run
//! use plant_scan::AnalyzerConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = AnalyzerConfig::from_json_file(Path::new("analyzer.json"))?;
//!
//! // Or use defaults
//! let config = AnalyzerConfig::default();
//! # Ok::<(), plant_scan::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`PreprocessingConfig`]: EXIF correction, pattern-pass downscale
//! - [`PatternConfig`]: grid steps of the pattern detectors
//! - [`SelectionConfig`]: how many diseases and treatments are considered
//! - [`QualityConfig`]: limits behind the advisory quality warnings

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Complete analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,
    #[serde(default)]
    pub pattern: PatternConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

/// Decode-time adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Rotate phone photos upright using the EXIF orientation tag
    pub exif_correction: bool,

    /// Long edge in pixels the pattern pass works at; larger images are
    /// downscaled, smaller ones are left alone
    pub pattern_max_dimension: u32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            exif_correction: true,
            pattern_max_dimension: 200,
        }
    }
}

/// Sampling grid of the pattern detectors (pixels between samples)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Grid step for dark-center / bright-ring spot samples
    pub circular_step: u32,
    /// Grid step for 5x5 variance windows
    pub patch_step: u32,
    /// Row step for dark streak scanning
    pub line_row_step: u32,
    /// Grid step for white speck samples
    pub powder_step: u32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            circular_step: 3,
            patch_step: 5,
            line_row_step: 2,
            powder_step: 2,
        }
    }
}

/// Knowledge base selection limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Disease records scored per image
    pub max_candidates: usize,
    /// Treatments attached to a report
    pub max_treatments: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_candidates: 5,
            max_treatments: 5,
        }
    }
}

/// Limits for the advisory image quality checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Mean brightness below this is too dark (0-255)
    pub min_brightness: f32,
    /// Mean brightness above this is overexposed (0-255)
    pub max_brightness: f32,
    /// Brightness standard deviation below this is low contrast
    pub min_contrast: f32,
    /// Green-dominant percent below this means no plant in frame
    pub min_vegetation_percent: f32,
    /// Shorter image side below this is too small for pattern detection
    pub min_dimension: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_brightness: 40.0,
            max_brightness: 220.0,
            min_contrast: 20.0,
            min_vegetation_percent: 5.0,
            min_dimension: 100,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AnalysisError::config("Invalid analyzer configuration JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject values that would stall or break the detectors
    pub fn validate(&self) -> Result<()> {
        let steps = [
            ("pattern.circular_step", self.pattern.circular_step),
            ("pattern.patch_step", self.pattern.patch_step),
            ("pattern.line_row_step", self.pattern.line_row_step),
            ("pattern.powder_step", self.pattern.powder_step),
            (
                "preprocessing.pattern_max_dimension",
                self.preprocessing.pattern_max_dimension,
            ),
        ];
        for (name, value) in steps {
            if value == 0 {
                return Err(AnalysisError::invalid(name, value));
            }
        }
        if self.selection.max_candidates == 0 {
            return Err(AnalysisError::invalid("selection.max_candidates", 0));
        }
        if self.quality.min_brightness >= self.quality.max_brightness {
            return Err(AnalysisError::invalid(
                "quality.min_brightness",
                self.quality.min_brightness,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.selection.max_candidates, 5);
        assert_eq!(config.preprocessing.pattern_max_dimension, 200);
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut config = AnalyzerConfig::default();
        config.pattern.patch_step = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pattern.patch_step"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{ "selection": { "max_candidates": 3, "max_treatments": 2 } }"#)
                .unwrap();
        assert_eq!(config.selection.max_candidates, 3);
        assert_eq!(config.pattern, PatternConfig::default());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyzer.json");

        let mut config = AnalyzerConfig::default();
        config.quality.min_dimension = 64;
        config.to_json_file(&path).unwrap();

        let loaded = AnalyzerConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AnalyzerConfig::from_json_file(Path::new("no/such/analyzer.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigError { .. }));
    }
}
