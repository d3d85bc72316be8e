use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;

use redaction_application::{ProcessTranscriptRequest, ProcessTranscriptResponse};

use crate::error::{
    error_mapper, HttpError, INVALID_ID_MESSAGE, INVALID_JSON_MESSAGE,
    INVALID_TRANSCRIPTION_MESSAGE,
};
use crate::AppState;

pub async fn process_transcript(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ProcessTranscriptResponse>), HttpError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(rejection = %rejection, "invalid json payload");
        HttpError::Validation {
            message: INVALID_JSON_MESSAGE.to_string(),
        }
    })?;
    let request = validate_payload(&payload)?;

    tracing::info!(
        transcript_id = %request.id,
        transcription_chars = request.transcription.chars().count(),
        "received process transcript request"
    );

    match state.usecase.process(request).await {
        Ok(response) => {
            tracing::info!("process transcript request completed");
            Ok((StatusCode::OK, Json(response)))
        }
        Err(error) => {
            tracing::error!(error = %error, "process transcript request failed");
            Err(error_mapper(error))
        }
    }
}

/// Field checks run before any external call. An empty `transcription` string
/// is valid; an absent or non-string one is not.
fn validate_payload(payload: &Value) -> Result<ProcessTranscriptRequest, HttpError> {
    let id = match payload.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => {
            return Err(HttpError::Validation {
                message: INVALID_ID_MESSAGE.to_string(),
            });
        }
    };
    let transcription = match payload.get("transcription") {
        Some(Value::String(text)) => text.clone(),
        _ => {
            return Err(HttpError::Validation {
                message: INVALID_TRANSCRIPTION_MESSAGE.to_string(),
            });
        }
    };
    Ok(ProcessTranscriptRequest { id, transcription })
}

pub async fn method_not_allowed() -> HttpError {
    HttpError::MethodNotAllowed
}

pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(result: Result<ProcessTranscriptRequest, HttpError>) -> String {
        match result {
            Err(HttpError::Validation { message }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_payload_passes() {
        let request = validate_payload(&json!({"id": "T1", "transcription": "hello"}))
            .expect("payload is valid");
        assert_eq!(request.id, "T1");
        assert_eq!(request.transcription, "hello");
    }

    #[test]
    fn empty_transcription_is_allowed() {
        let request = validate_payload(&json!({"id": "T1", "transcription": ""}))
            .expect("empty transcription is present and string-typed");
        assert_eq!(request.transcription, "");
    }

    #[test]
    fn missing_id_is_rejected() {
        let result = validate_payload(&json!({"transcription": "hello"}));
        assert_eq!(message(result), INVALID_ID_MESSAGE);
    }

    #[test]
    fn non_string_id_is_rejected() {
        let result = validate_payload(&json!({"id": 7, "transcription": "hello"}));
        assert_eq!(message(result), INVALID_ID_MESSAGE);
    }

    #[test]
    fn empty_id_is_rejected() {
        let result = validate_payload(&json!({"id": "", "transcription": "hello"}));
        assert_eq!(message(result), INVALID_ID_MESSAGE);
    }

    #[test]
    fn missing_transcription_is_rejected() {
        let result = validate_payload(&json!({"id": "T1"}));
        assert_eq!(message(result), INVALID_TRANSCRIPTION_MESSAGE);
    }

    #[test]
    fn non_string_transcription_is_rejected() {
        let result = validate_payload(&json!({"id": "T1", "transcription": null}));
        assert_eq!(message(result), INVALID_TRANSCRIPTION_MESSAGE);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let result = validate_payload(&json!("just a string"));
        assert_eq!(message(result), INVALID_ID_MESSAGE);
    }
}
