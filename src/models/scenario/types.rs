use std::fmt;

use serde::{Deserialize, Serialize};

/// Certification tiers, ordered by scope of practice: EMT < AEMT < Paramedic.
/// The derived ordering follows variant declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CertLevel {
    #[serde(rename = "EMT")]
    Emt,
    #[serde(rename = "AEMT")]
    Aemt,
    #[serde(rename = "Paramedic")]
    Paramedic,
}

impl CertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertLevel::Emt => "EMT",
            CertLevel::Aemt => "AEMT",
            CertLevel::Paramedic => "Paramedic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMT" => Some(CertLevel::Emt),
            "AEMT" => Some(CertLevel::Aemt),
            "Paramedic" => Some(CertLevel::Paramedic),
            _ => None,
        }
    }
}

impl fmt::Display for CertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One selectable answer on a scenario step. `is_correct` and `feedback`
/// are the answer key; they never appear in catalog payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
    #[serde(default)]
    pub feedback: String,
}

/// A single authored step. Steps with no choices are informational and
/// auto-advance without evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub action: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub time_limit_seconds: Option<u64>,
    /// Certification levels for which this action exceeds scope of practice.
    #[serde(default)]
    pub beyond_scope: Vec<CertLevel>,
    /// Outcome text used when the step's time limit is exceeded.
    #[serde(default)]
    pub consequence: Option<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
}

/// Scheduled vitals update applied after the step at `after_step` (0-based)
/// completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsChange {
    pub after_step: usize,
    pub new_vitals: String,
}

/// Authored branching training exercise. Static content, read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingScenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub initial_vitals: String,
    #[serde(default)]
    pub vitals_changes: Vec<VitalsChange>,
    pub certification_level: CertLevel,
    pub difficulty: Difficulty,
    pub steps: Vec<ScenarioStep>,
}

impl TrainingScenario {
    /// Authoring-time validation: a playable scenario has at least one step
    /// and every vitals change references a valid step index.
    pub fn validate(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err(format!("scenario '{}' has no steps", self.id));
        }
        for vc in &self.vitals_changes {
            if vc.after_step >= self.steps.len() {
                return Err(format!(
                    "scenario '{}': vitals change after_step {} out of range ({} steps)",
                    self.id,
                    vc.after_step,
                    self.steps.len()
                ));
            }
        }
        Ok(())
    }

    /// Count of steps that carry choices, i.e. the score denominator for a
    /// perfect run under the warn policy.
    pub fn evaluated_step_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.choices.is_empty()).count()
    }
}
