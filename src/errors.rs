use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Json(serde_json::Error),
    InvalidInput(String),
    UnsupportedDocument(String),
    InvalidScenario(String),
    SessionNotFound(i64),
    StepIndexOutOfRange { index: usize, len: usize },
    ScopeViolation(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Json(e) => write!(f, "Serialization error: {e}"),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            AppError::UnsupportedDocument(ext) => {
                write!(f, "Unsupported document type: {ext}")
            }
            AppError::InvalidScenario(msg) => write!(f, "Invalid scenario: {msg}"),
            AppError::SessionNotFound(id) => write!(f, "Session {id} not found"),
            AppError::StepIndexOutOfRange { index, len } => {
                write!(f, "Choice index {index} out of range (step has {len} choices)")
            }
            AppError::ScopeViolation(msg) => write!(f, "Scope violation: {msg}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "error": self.to_string() });
        match self {
            AppError::NotFound | AppError::SessionNotFound(_) => {
                HttpResponse::NotFound().json(body)
            }
            AppError::InvalidInput(_)
            | AppError::UnsupportedDocument(_)
            | AppError::StepIndexOutOfRange { .. } => HttpResponse::BadRequest().json(body),
            AppError::ScopeViolation(_) => HttpResponse::Forbidden().json(body),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "Internal Server Error" }))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
