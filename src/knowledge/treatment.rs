//! Treatment records

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::DiseaseCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentType {
    Chemical,
    Organic,
    Biological,
    Cultural,
    Advanced,
}

impl TreatmentType {
    /// Type reported to consumers; the report schema has no `advanced` value
    pub fn reported(self) -> Self {
        match self {
            TreatmentType::Advanced => TreatmentType::Biological,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f32,
    pub max: f32,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

/// One entry of the treatment knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub treatment_type: TreatmentType,
    pub target_categories: BTreeSet<DiseaseCategory>,
    pub dosage: String,
    pub application_method: String,
    pub cost: CostRange,
    /// Expected success rate in percent
    pub effectiveness: f32,
    pub safety_rating: String,
}

impl TreatmentRecord {
    pub fn targets(&self, category: DiseaseCategory) -> bool {
        self.target_categories.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advanced_reported_as_biological() {
        assert_eq!(TreatmentType::Advanced.reported(), TreatmentType::Biological);
        assert_eq!(TreatmentType::Chemical.reported(), TreatmentType::Chemical);
        assert_eq!(TreatmentType::Cultural.reported(), TreatmentType::Cultural);
    }

    #[test]
    fn test_treatment_from_json() {
        let json = r#"{
            "id": "copper",
            "name": "Copper Oxychloride",
            "type": "chemical",
            "targetCategories": ["fungal", "bacterial"],
            "dosage": "3 g/L",
            "applicationMethod": "Foliar spray",
            "cost": { "min": 250, "max": 400 },
            "effectiveness": 80,
            "safetyRating": "moderate"
        }"#;
        let treatment: TreatmentRecord = serde_json::from_str(json).unwrap();
        assert!(treatment.targets(DiseaseCategory::Bacterial));
        assert!(!treatment.targets(DiseaseCategory::Viral));
        assert_eq!(treatment.cost.currency, "INR");
    }
}
