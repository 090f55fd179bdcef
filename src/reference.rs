//! Static clinical reference content: medication cards, field calculators,
//! and equipment checklists. Loaded once at startup, read-only after that.

use serde::{Deserialize, Serialize};

use crate::models::scenario::CertLevel;

const REFERENCE_SEED: &str = include_str!("../data/reference.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationRef {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub indications: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    pub adult_dose: String,
    #[serde(default)]
    pub pediatric_dose: Option<String>,
    #[serde(default)]
    pub routes: Vec<String>,
    /// Minimum certification level that may administer this medication.
    pub cert_level: CertLevel,
}

/// Field calculator card. The formula is display text for the frontend;
/// no arithmetic is evaluated server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorRef {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    pub formula: String,
}

/// Equipment checklist. Authored content may ship with an empty item list;
/// that is a content gap, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub medications: Vec<MedicationRef>,
    #[serde(default)]
    pub calculators: Vec<CalculatorRef>,
    #[serde(default)]
    pub checklists: Vec<ChecklistRef>,
}

impl ReferenceData {
    pub fn load_builtin() -> Self {
        let data: ReferenceData = serde_json::from_str(REFERENCE_SEED)
            .unwrap_or_else(|e| panic!("Bad reference seed JSON: {e}"));
        log::info!(
            "Loaded reference data: {} medications, {} calculators, {} checklists",
            data.medications.len(),
            data.calculators.len(),
            data.checklists.len()
        );
        data
    }
}
