use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::protocol::types::{Category, ProtocolDraft};
use crate::storage::Store;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

fn validate_draft(draft: &ProtocolDraft) -> Vec<String> {
    let mut errors = Vec::new();
    if draft.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if draft.name.len() > 200 {
        errors.push("Name must be 200 characters or less".to_string());
    }
    errors
}

fn validation_failed(errors: Vec<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Validation failed",
        "details": errors.join("; "),
    }))
}

/// GET /api/v1/protocols - List protocols with optional category filter
pub async fn list(
    store: web::Data<dyn Store>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let category = match query.category.as_deref() {
        Some(raw) => Some(Category::parse(raw).ok_or_else(|| {
            AppError::InvalidInput(format!("unknown category '{raw}'"))
        })?),
        None => None,
    };

    let protocols = store.list_protocols(category)?;
    Ok(HttpResponse::Ok().json(protocols))
}

/// GET /api/v1/protocols/{id} - Get single protocol by ID
pub async fn read(
    store: web::Data<dyn Store>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let protocol = store.get_protocol(id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(protocol))
}

/// POST /api/v1/protocols - Create a protocol from a direct draft submission
pub async fn create(
    store: web::Data<dyn Store>,
    body: web::Json<ProtocolDraft>,
) -> Result<HttpResponse, AppError> {
    let errors = validate_draft(&body);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let protocol = store.create_protocol(&body)?;
    log::info!("Created protocol '{}' (id {})", protocol.name, protocol.id);
    Ok(HttpResponse::Created().json(protocol))
}

/// PUT /api/v1/protocols/{id} - Replace a protocol from a draft
pub async fn update(
    store: web::Data<dyn Store>,
    path: web::Path<i64>,
    body: web::Json<ProtocolDraft>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let errors = validate_draft(&body);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let protocol = store.update_protocol(id, &body)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(protocol))
}

/// DELETE /api/v1/protocols/{id}
pub async fn delete(
    store: web::Data<dyn Store>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !store.delete_protocol(id)? {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}
