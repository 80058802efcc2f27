//! Disease and treatment knowledge bases
//!
//! The catalogues are owned by the host application and passed into each
//! analysis call read-only. Nothing here is global.

pub mod disease;
pub mod treatment;

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use disease::{DiseaseCategory, DiseaseRecord, PlantPart, Severity};
pub use treatment::{CostRange, TreatmentRecord, TreatmentType};

use crate::error::{AnalysisError, Result};

/// Disease and treatment catalogues supplied by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub diseases: Vec<DiseaseRecord>,
    pub treatments: Vec<TreatmentRecord>,
}

impl KnowledgeBase {
    pub fn new(diseases: Vec<DiseaseRecord>, treatments: Vec<TreatmentRecord>) -> Self {
        Self { diseases, treatments }
    }

    /// Parse a catalogue of the form `{"diseases": [...], "treatments": [...]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let kb: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::config("Invalid knowledge base JSON", e))?;
        kb.validate()?;
        Ok(kb)
    }

    /// Load a catalogue from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Reject catalogues with duplicate ids
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for disease in &self.diseases {
            if !seen.insert(disease.id.as_str()) {
                return Err(AnalysisError::invalid("disease.id", &disease.id));
            }
        }
        seen.clear();
        for treatment in &self.treatments {
            if !seen.insert(treatment.id.as_str()) {
                return Err(AnalysisError::invalid("treatment.id", &treatment.id));
            }
        }
        Ok(())
    }

    /// Diseases affecting any of `parts`, in catalogue order, at most `limit`
    pub fn candidates_for(&self, parts: &BTreeSet<PlantPart>, limit: usize) -> Vec<&DiseaseRecord> {
        self.diseases
            .iter()
            .filter(|d| !d.plant_parts.is_disjoint(parts))
            .take(limit)
            .collect()
    }

    /// Treatments targeting `category`, in catalogue order, at most `limit`
    pub fn treatments_for(&self, category: DiseaseCategory, limit: usize) -> Vec<&TreatmentRecord> {
        self.treatments
            .iter()
            .filter(|t| t.targets(category))
            .take(limit)
            .collect()
    }
}
