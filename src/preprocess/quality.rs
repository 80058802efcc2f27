//! Advisory image quality checks
//!
//! Warnings never block analysis. They are attached to the report so the UI
//! can suggest a better photo.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::QualityConfig;
use crate::image_loader::PixelBuffer;

/// Non-fatal quality issue found in a photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum QualityWarning {
    TooDark { mean_brightness: f32 },
    TooBright { mean_brightness: f32 },
    LowContrast { contrast: f32 },
    NoVegetation { vegetation_percentage: f32 },
    TooSmall { width: u32, height: u32 },
}

impl QualityWarning {
    /// What the user can do about it
    pub fn suggestion(&self) -> &'static str {
        match self {
            QualityWarning::TooDark { .. } => {
                "Image is too dark. Take the photo in daylight or with more light on the plant."
            }
            QualityWarning::TooBright { .. } => {
                "Image is overexposed. Avoid direct sunlight or flash on the leaf."
            }
            QualityWarning::LowContrast { .. } => {
                "Image has low contrast. Make sure the plant is in focus and fills the frame."
            }
            QualityWarning::NoVegetation { .. } => {
                "Little plant tissue detected. Center the affected leaf, stem or fruit in the photo."
            }
            QualityWarning::TooSmall { .. } => {
                "Image resolution is low. Move closer or use a higher resolution camera setting."
            }
        }
    }
}

/// Brightness statistics and the warnings derived from them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub mean_brightness: f32,
    /// Standard deviation of brightness
    pub contrast: f32,
    pub warnings: Vec<QualityWarning>,
}

impl QualityReport {
    pub fn is_acceptable(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.suggestion().to_string()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QualityAssessor {
    config: QualityConfig,
}

impl QualityAssessor {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Check exposure, contrast, size and plant coverage
    ///
    /// `vegetation_percentage` comes from the color analyzer so the pixels are
    /// not bucketed twice.
    pub fn assess(&self, pixels: &PixelBuffer, vegetation_percentage: f32) -> QualityReport {
        let mut report = QualityReport::default();
        let total = pixels.pixel_count();

        if pixels.width().min(pixels.height()) < self.config.min_dimension {
            report.warnings.push(QualityWarning::TooSmall {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        if total == 0 {
            return report;
        }

        let (sum, sum_sq) = pixels.pixels().fold((0.0f64, 0.0f64), |(s, sq), p| {
            let v = crate::image_loader::brightness(p[0], p[1], p[2]) as f64;
            (s + v, sq + v * v)
        });
        let mean = sum / total as f64;
        let variance = (sum_sq / total as f64 - mean * mean).max(0.0);
        report.mean_brightness = mean as f32;
        report.contrast = variance.sqrt() as f32;

        if report.mean_brightness < self.config.min_brightness {
            report.warnings.push(QualityWarning::TooDark {
                mean_brightness: report.mean_brightness,
            });
        } else if report.mean_brightness > self.config.max_brightness {
            report.warnings.push(QualityWarning::TooBright {
                mean_brightness: report.mean_brightness,
            });
        }
        if report.contrast < self.config.min_contrast {
            report.warnings.push(QualityWarning::LowContrast {
                contrast: report.contrast,
            });
        }
        if vegetation_percentage < self.config.min_vegetation_percent {
            report.warnings.push(QualityWarning::NoVegetation {
                vegetation_percentage,
            });
        }

        for warning in &report.warnings {
            warn!(?warning, "image quality issue");
        }
        report
    }
}
