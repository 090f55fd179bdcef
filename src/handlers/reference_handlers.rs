use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::reference::ReferenceData;

/// GET /api/v1/reference/medications
pub async fn medications(data: web::Data<ReferenceData>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(&data.medications))
}

/// GET /api/v1/reference/calculators
pub async fn calculators(data: web::Data<ReferenceData>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(&data.calculators))
}

/// GET /api/v1/reference/checklists
pub async fn checklists(data: web::Data<ReferenceData>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(&data.checklists))
}
