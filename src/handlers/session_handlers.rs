use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::scenario::CertLevel;
use crate::player::SessionManager;
use crate::storage::Store;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub scenario_id: String,
    pub cert_level: CertLevel,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Omitted for informational steps, which advance without evaluation.
    pub choice_index: Option<usize>,
}

/// POST /api/v1/sessions - Start a scenario session
pub async fn start(
    sessions: web::Data<SessionManager>,
    body: web::Json<StartRequest>,
) -> Result<HttpResponse, AppError> {
    let session = sessions.start(&body.scenario_id, body.cert_level)?;
    log::info!(
        "Started session {} (scenario '{}', {})",
        session.id,
        session.scenario_id,
        session.cert_level
    );
    Ok(HttpResponse::Created().json(session))
}

/// GET /api/v1/sessions/{id} - Session state
pub async fn read(
    sessions: web::Data<SessionManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let session = sessions.get(path.into_inner())?;
    Ok(HttpResponse::Ok().json(session))
}

/// GET /api/v1/sessions/{id}/step - Current step view
pub async fn current_step(
    sessions: web::Data<SessionManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    match sessions.step_view(id)? {
        Some(view) => Ok(HttpResponse::Ok().json(view)),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({ "completed": true }))),
    }
}

/// POST /api/v1/sessions/{id}/answer - Submit a choice or advance an
/// informational step
pub async fn answer(
    sessions: web::Data<SessionManager>,
    path: web::Path<i64>,
    body: web::Json<AnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let result = sessions.submit(path.into_inner(), body.choice_index)?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/v1/sessions/{id}/vitals
pub async fn vitals(
    sessions: web::Data<SessionManager>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let vitals = sessions.current_vitals(path.into_inner())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "vitals": vitals })))
}

/// POST /api/v1/sessions/{id}/finalize - Score the session and persist the
/// assessment and progress records. Idempotent on the session; each call
/// persists a fresh record pair for the same state.
pub async fn finalize(
    sessions: web::Data<SessionManager>,
    store: web::Data<dyn Store>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (assessment, progress) = sessions.finalize(id)?;

    let saved_assessment = store.create_assessment(&assessment)?;
    let saved_progress = store.create_progress(&progress)?;
    log::info!(
        "Finalized session {id}: score {:.1} ({}/{} evaluated steps)",
        saved_assessment.score,
        saved_assessment.correct_steps,
        saved_assessment.evaluated_steps
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "assessment": saved_assessment,
        "progress": saved_progress,
    })))
}

/// DELETE /api/v1/sessions/{id} - Abandon a session. Records incomplete
/// progress so abandonment shows up in the learner's history.
pub async fn abandon(
    sessions: web::Data<SessionManager>,
    store: web::Data<dyn Store>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let session = sessions.abandon(id)?;

    let progress = crate::models::progress::NewUserProgress {
        scenario_id: session.scenario_id.clone(),
        cert_level: session.cert_level,
        completed: false,
        score: None,
    };
    let _ = store.create_progress(&progress);
    log::info!("Abandoned session {id} (scenario '{}')", session.scenario_id);

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/progress
pub async fn list_progress(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.list_progress()?))
}

/// GET /api/v1/assessments
pub async fn list_assessments(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.list_assessments()?))
}
