use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::scenario::{CertLevel, Difficulty, ScenarioSet, TrainingScenario};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub difficulty: Option<Difficulty>,
    pub certification_level: Option<CertLevel>,
}

#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub certification_level: CertLevel,
    pub difficulty: Difficulty,
    pub step_count: usize,
}

/// Catalog view of one step. Choice texts are included so the frontend can
/// preview the exercise, but the answer key (`is_correct`, `feedback`)
/// never leaves the server outside a live session.
#[derive(Debug, Serialize)]
pub struct PublicStep {
    pub action: String,
    pub choices: Vec<String>,
    pub time_limit_seconds: Option<u64>,
    pub beyond_scope: Vec<CertLevel>,
}

#[derive(Debug, Serialize)]
pub struct ScenarioDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub initial_vitals: String,
    pub certification_level: CertLevel,
    pub difficulty: Difficulty,
    pub steps: Vec<PublicStep>,
}

fn summary(s: &TrainingScenario) -> ScenarioSummary {
    ScenarioSummary {
        id: s.id.clone(),
        title: s.title.clone(),
        description: s.description.clone(),
        certification_level: s.certification_level,
        difficulty: s.difficulty,
        step_count: s.steps.len(),
    }
}

/// GET /api/v1/scenarios - List scenarios with optional filters
pub async fn list(
    scenarios: web::Data<ScenarioSet>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let items: Vec<ScenarioSummary> = scenarios
        .all()
        .iter()
        .filter(|s| query.difficulty.is_none_or(|d| s.difficulty == d))
        .filter(|s| {
            query
                .certification_level
                .is_none_or(|c| s.certification_level == c)
        })
        .map(summary)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/v1/scenarios/{id} - Full scenario definition minus answer keys
pub async fn read(
    scenarios: web::Data<ScenarioSet>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let scenario = scenarios.get(&id).ok_or(AppError::NotFound)?;

    let steps = scenario
        .steps
        .iter()
        .map(|step| PublicStep {
            action: step.action.clone(),
            choices: step.choices.iter().map(|c| c.text.clone()).collect(),
            time_limit_seconds: step.time_limit_seconds,
            beyond_scope: step.beyond_scope.clone(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ScenarioDetail {
        id: scenario.id.clone(),
        title: scenario.title.clone(),
        description: scenario.description.clone(),
        initial_vitals: scenario.initial_vitals.clone(),
        certification_level: scenario.certification_level,
        difficulty: scenario.difficulty,
        steps,
    }))
}
