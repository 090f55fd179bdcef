use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extractor;
use crate::models::protocol::types::Protocol;
use crate::storage::Store;

/// Document types the importer accepts. PDF text extraction happens
/// upstream; by the time a request reaches this handler the payload is
/// already plain text.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

/// Upper bound on submitted text, mirroring the upload size cap.
const MAX_TEXT_BYTES: usize = 1_000_000;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn check_upload(req: &UploadRequest) -> Result<(), AppError> {
    if req.filename.trim().is_empty() {
        return Err(AppError::InvalidInput("filename is required".to_string()));
    }
    if req.text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "document text is empty".to_string(),
        ));
    }
    if req.text.len() > MAX_TEXT_BYTES {
        return Err(AppError::InvalidInput(format!(
            "document text exceeds {MAX_TEXT_BYTES} bytes"
        )));
    }

    let ext = req
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::UnsupportedDocument(if ext.is_empty() {
            "missing file extension".to_string()
        } else {
            ext
        }));
    }
    Ok(())
}

/// POST /api/v1/protocols/upload - Extract a protocol draft from document
/// text and persist it. Extraction itself never fails on accepted input;
/// ambiguous documents degrade to the canned fallback steps.
pub async fn upload(
    store: web::Data<dyn Store>,
    body: web::Json<UploadRequest>,
) -> Result<HttpResponse, AppError> {
    if let Err(e) = check_upload(&body) {
        return Ok(HttpResponse::BadRequest().json(UploadResponse {
            success: false,
            protocol: None,
            message: "Document rejected".to_string(),
            error: Some(e.to_string()),
        }));
    }

    let draft = extractor::extract(&body.text, &body.filename);
    let protocol = store.create_protocol(&draft)?;
    log::info!(
        "Imported protocol '{}' (id {}, {} steps, {} medications)",
        protocol.name,
        protocol.id,
        protocol.steps.len(),
        protocol.medications.len()
    );

    Ok(HttpResponse::Created().json(UploadResponse {
        success: true,
        message: format!("Protocol '{}' imported", protocol.name),
        protocol: Some(protocol),
        error: None,
    }))
}
