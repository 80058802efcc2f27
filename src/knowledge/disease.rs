//! Disease records and the plant part vocabulary they are tagged with

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Visible plant organ a photo can show and a disease can affect
///
/// Declaration order is the fallback order used when a dominant part has to
/// be picked from a detected set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantPart {
    Leaf,
    Stem,
    Fruit,
    Flower,
    Tree,
    Root,
}

impl PlantPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantPart::Leaf => "leaf",
            PlantPart::Stem => "stem",
            PlantPart::Fruit => "fruit",
            PlantPart::Flower => "flower",
            PlantPart::Tree => "tree",
            PlantPart::Root => "root",
        }
    }
}

impl fmt::Display for PlantPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad cause of a disease, used to match treatments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseCategory {
    Fungal,
    Bacterial,
    Viral,
    Pest,
    Nutrient,
    Environmental,
}

impl DiseaseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseCategory::Fungal => "fungal",
            DiseaseCategory::Bacterial => "bacterial",
            DiseaseCategory::Viral => "viral",
            DiseaseCategory::Pest => "pest",
            DiseaseCategory::Nutrient => "nutrient",
            DiseaseCategory::Environmental => "environmental",
        }
    }
}

impl fmt::Display for DiseaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One entry of the disease knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRecord {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub category: DiseaseCategory,
    pub severity: Severity,
    pub plant_parts: BTreeSet<PlantPart>,
    /// Symptom phrases, matched by keyword during scoring
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub causes: Vec<String>,
    /// Typical yield loss in percent when left untreated
    pub economic_impact: f32,
}

impl DiseaseRecord {
    /// Parts this disease affects that are also in `parts`, in part order
    pub fn affected_parts<'a>(
        &'a self,
        parts: &'a BTreeSet<PlantPart>,
    ) -> impl Iterator<Item = PlantPart> + 'a {
        self.plant_parts.intersection(parts).copied()
    }

    /// Whether any symptom mentions `keyword`, ignoring case
    pub fn has_symptom_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.symptoms
            .iter()
            .any(|s| s.to_lowercase().contains(&keyword))
    }

    /// Whether the disease name mentions `keyword`, ignoring case
    pub fn name_contains(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(&keyword.to_lowercase())
    }
}
