use std::sync::Arc;
use std::time::Duration;

use anyhow::Error;

use redaction_application::{ProcessTranscriptUseCase, ProcessTranscriptUseCaseImpl};
use redaction_configuration::{AppConfig, ServerConfig};
use redaction_domain::{BlobStorePort, PiiDetectionPort};
use redaction_http_server::{serve, AppState};
use redaction_infra_blob_storage::{BlobAdapterConfig, BlobStorageAdapter};
use redaction_infra_pii_language::{LanguageAdapterConfig, LanguagePiiAdapter};

pub async fn build_and_run(config: AppConfig, server_config: ServerConfig) -> Result<(), Error> {
    let app = Application::new(config);
    app.run(server_config).await
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        // Missing secrets surface per request, not at startup.
        tracing::info!(
            detection_configured = config.service.detection.endpoint.is_some(),
            storage_configured = config.service.storage.connection_string.is_some(),
            document_language = %config.service.detection.document_language,
            "initializing redaction application"
        );

        let detection: Arc<dyn PiiDetectionPort> =
            Arc::new(LanguagePiiAdapter::new(LanguageAdapterConfig {
                endpoint: config.service.detection.endpoint.clone(),
                access_key: config.service.detection.access_key.clone(),
                api_version: config.service.detection.api_version.clone(),
                document_language: config.service.detection.document_language.clone(),
                request_timeout: Duration::from_millis(config.service.detection.request_timeout_ms),
            }));
        let store: Arc<dyn BlobStorePort> = Arc::new(BlobStorageAdapter::new(BlobAdapterConfig {
            connection_string: config.service.storage.connection_string.clone(),
            request_timeout: Duration::from_millis(config.service.storage.request_timeout_ms),
        }));

        Self::with_ports(config, detection, store)
    }

    pub fn with_ports(
        config: AppConfig,
        detection: Arc<dyn PiiDetectionPort>,
        store: Arc<dyn BlobStorePort>,
    ) -> Self {
        let usecase: Arc<dyn ProcessTranscriptUseCase> =
            Arc::new(ProcessTranscriptUseCaseImpl::new(detection, store));
        Self {
            config,
            state: AppState { usecase },
        }
    }

    pub async fn run(self, server_config: ServerConfig) -> Result<(), Error> {
        tracing::info!(
            host = %server_config.host,
            port = server_config.port,
            "starting redaction http server"
        );
        serve(self.state, &server_config).await
    }
}
