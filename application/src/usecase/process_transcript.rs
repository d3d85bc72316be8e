use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use redaction_domain::{redact, BlobStorePort, PiiDetectionPort, StoredArtifact};

use crate::{ApplicationError, ProcessTranscriptRequest, ProcessTranscriptResponse};

#[async_trait]
pub trait ProcessTranscriptUseCase: Send + Sync {
    async fn process(
        &self,
        request: ProcessTranscriptRequest,
    ) -> Result<ProcessTranscriptResponse, ApplicationError>;
}

pub struct ProcessTranscriptUseCaseImpl {
    detection: Arc<dyn PiiDetectionPort>,
    store: Arc<dyn BlobStorePort>,
}

impl ProcessTranscriptUseCaseImpl {
    pub fn new(detection: Arc<dyn PiiDetectionPort>, store: Arc<dyn BlobStorePort>) -> Self {
        Self { detection, store }
    }
}

#[async_trait]
impl ProcessTranscriptUseCase for ProcessTranscriptUseCaseImpl {
    async fn process(
        &self,
        request: ProcessTranscriptRequest,
    ) -> Result<ProcessTranscriptResponse, ApplicationError> {
        request
            .validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;

        tracing::debug!(
            transcript_id = %request.id,
            transcription_chars = request.transcription.chars().count(),
            "starting transcript processing"
        );

        let entities = self.detection.detect_pii(&request.transcription).await?;

        let cleaned = redact(&request.transcription, &entities);
        // Entity text stays out of the log stream; category and span only.
        for entity in &entities {
            tracing::debug!(
                transcript_id = %request.id,
                category = %entity.category,
                length = entity.length,
                "redacted entity"
            );
        }
        tracing::info!(
            transcript_id = %request.id,
            entity_count = entities.len(),
            "pii redaction completed"
        );

        self.store
            .store(StoredArtifact::cleaned_transcript(&request.id, &cleaned))
            .await?;
        tracing::info!(transcript_id = %request.id, "stored cleaned transcript");

        Ok(ProcessTranscriptResponse {
            transcription: cleaned,
        })
    }
}
