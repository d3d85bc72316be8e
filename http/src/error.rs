use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use redaction_application::ApplicationError;
use redaction_domain::StorageError;

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON payload";
pub const INVALID_ID_MESSAGE: &str = "Field 'id' is required and must be a string";
pub const INVALID_TRANSCRIPTION_MESSAGE: &str =
    "Field 'transcription' is required and must be a string";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed. Use POST.";
pub const DETECTION_FAILED_MESSAGE: &str = "Failed to remove PII from transcription";
pub const STORAGE_NOT_CONFIGURED_MESSAGE: &str =
    "Storage connection string not configured. Set 'AzureWebJobsStorage' in settings.";
pub const STORAGE_FAILED_MESSAGE: &str = "Failed to save cleaned transcript";

#[derive(Debug)]
pub enum HttpError {
    Validation { message: String },
    MethodNotAllowed,
    Internal { message: String },
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::Validation { message } => error_body(StatusCode::BAD_REQUEST, &message),
            HttpError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "POST")],
                Json(json!({"error": METHOD_NOT_ALLOWED_MESSAGE})),
            )
                .into_response(),
            HttpError::Internal { message } => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, &message)
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

/// Backend failure detail never reaches the client body; it is logged at the
/// handler and mapped to the fixed message for its stage here.
pub fn error_mapper(error: ApplicationError) -> HttpError {
    match error {
        ApplicationError::Validation(message) => HttpError::Validation { message },
        ApplicationError::Detection(_) => HttpError::Internal {
            message: DETECTION_FAILED_MESSAGE.to_string(),
        },
        ApplicationError::Storage(StorageError::NotConfigured) => HttpError::Internal {
            message: STORAGE_NOT_CONFIGURED_MESSAGE.to_string(),
        },
        ApplicationError::Storage(_) => HttpError::Internal {
            message: STORAGE_FAILED_MESSAGE.to_string(),
        },
    }
}
