use serde::{Deserialize, Serialize};
use validator::Validate;

/// Validated inbound payload. `transcription` may be empty, but it must be
/// present; absence is rejected at the HTTP boundary.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProcessTranscriptRequest {
    #[validate(length(min = 1))]
    pub id: String,
    pub transcription: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessTranscriptResponse {
    pub transcription: String,
}
