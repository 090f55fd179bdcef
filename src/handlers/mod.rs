pub mod protocol_handlers;
pub mod reference_handlers;
pub mod scenario_handlers;
pub mod session_handlers;
pub mod upload_handlers;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::models::scenario::ScenarioSet;
use crate::storage::Store;

/// CSRF protection for REST API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type: application/json.
/// Browsers cannot send cross-origin JSON with cookies via simple form POST —
/// the Content-Type check acts as a CSRF guard without requiring tokens.
/// GET requests are exempt (read-only, no state changes).
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// GET /api/v1/health
async fn health(
    store: web::Data<dyn Store>,
    scenarios: web::Data<ScenarioSet>,
) -> Result<HttpResponse, crate::errors::AppError> {
    let protocols = store.count_protocols()?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "protocols": protocols,
        "scenarios": scenarios.len(),
    })))
}

/// Configure API v1 routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
    cfg.service(
        web::scope("/protocols")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(protocol_handlers::list))
            .route("", web::post().to(protocol_handlers::create))
            // /upload BEFORE /{id} to avoid routing conflict
            .route("/upload", web::post().to(upload_handlers::upload))
            .route("/{id}", web::get().to(protocol_handlers::read))
            .route("/{id}", web::put().to(protocol_handlers::update))
            .route("/{id}", web::delete().to(protocol_handlers::delete)),
    );
    cfg.service(
        web::scope("/scenarios")
            .route("", web::get().to(scenario_handlers::list))
            .route("/{id}", web::get().to(scenario_handlers::read)),
    );
    cfg.service(
        web::scope("/sessions")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::post().to(session_handlers::start))
            .route("/{id}", web::get().to(session_handlers::read))
            .route("/{id}", web::delete().to(session_handlers::abandon))
            .route("/{id}/step", web::get().to(session_handlers::current_step))
            .route("/{id}/answer", web::post().to(session_handlers::answer))
            .route("/{id}/vitals", web::get().to(session_handlers::vitals))
            .route("/{id}/finalize", web::post().to(session_handlers::finalize)),
    );
    cfg.service(
        web::scope("/reference")
            .route("/medications", web::get().to(reference_handlers::medications))
            .route("/calculators", web::get().to(reference_handlers::calculators))
            .route("/checklists", web::get().to(reference_handlers::checklists)),
    );
    cfg.route("/progress", web::get().to(session_handlers::list_progress));
    cfg.route("/assessments", web::get().to(session_handlers::list_assessments));
}
