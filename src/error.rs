//! Error types for the plant_scan library

use thiserror::Error;

use crate::knowledge::PlantPart;

/// Result type alias for plant_scan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for plant image analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image bytes could not be read or decoded into a pixel buffer
    #[error("Failed to decode image: {message}")]
    DecodeError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No disease record in the knowledge base matches the detected plant parts
    #[error("No disease candidates for detected parts: {}", format_parts(.detected_parts))]
    NoCandidates { detected_parts: Vec<PlantPart> },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration or catalogue file could not be loaded
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn format_parts(parts: &[PlantPart]) -> String {
    if parts.is_empty() {
        return "none".to_string();
    }
    parts
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl AnalysisError {
    /// Create a decode error with context
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DecodeError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error without an underlying cause
    pub fn decode_msg(message: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a condition the user can fix by retrying
    /// with a different photo
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::DecodeError { .. } | AnalysisError::NoCandidates { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::DecodeError { .. } => {
                "Could not read the image. Please upload a JPEG, PNG or WebP photo and try again.".to_string()
            }
            AnalysisError::NoCandidates { .. } => {
                "There is not enough evidence in this photo for a diagnosis. Please take a closer photo of the affected leaf, stem or fruit.".to_string()
            }
            AnalysisError::ConfigError { .. } => {
                "The disease catalogue could not be loaded.".to_string()
            }
            _ => "Plant analysis failed. Please try with a different image.".to_string(),
        }
    }
}
