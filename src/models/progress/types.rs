use serde::{Deserialize, Serialize};

use crate::models::scenario::CertLevel;

/// Outcome of one answered (or auto-advanced) step, kept in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResponse {
    pub step_index: usize,
    /// None for informational steps that auto-advanced.
    pub choice_index: Option<usize>,
    /// None when the step was not evaluated.
    pub correct: Option<bool>,
    pub elapsed_seconds: i64,
    pub timed_out: bool,
}

/// New progress row for a finished or abandoned session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserProgress {
    pub scenario_id: String,
    pub cert_level: CertLevel,
    pub completed: bool,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProgress {
    pub id: i64,
    pub scenario_id: String,
    pub cert_level: CertLevel,
    pub completed: bool,
    pub score: Option<f64>,
    pub created_at: String,
}

/// Scored record produced by finalizing a player session.
/// `evaluated_steps == 0` marks an all-informational run; its score is
/// reported as 100.0 by convention (nothing was attempted incorrectly).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssessment {
    pub scenario_id: String,
    pub cert_level: CertLevel,
    pub score: f64,
    pub evaluated_steps: i64,
    pub correct_steps: i64,
    pub responses: Vec<StepResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub id: i64,
    pub scenario_id: String,
    pub cert_level: CertLevel,
    pub score: f64,
    pub evaluated_steps: i64,
    pub correct_steps: i64,
    pub responses: Vec<StepResponse>,
    pub created_at: String,
}
