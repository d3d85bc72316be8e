use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;

use redaction_configuration::AppConfig;
use redaction_domain::{
    BlobStorePort, DetectionError, PiiDetectionPort, PiiEntity, StorageError, StoredArtifact,
};
use redaction_http_server::create_router;
use redaction_setup::Application;

/// Deterministic in-memory detection port.
pub struct FakeDetection {
    entities: Vec<PiiEntity>,
    not_configured: bool,
    calls: Mutex<usize>,
}

impl FakeDetection {
    pub fn with_entities(entities: Vec<PiiEntity>) -> Arc<Self> {
        Arc::new(Self {
            entities,
            not_configured: false,
            calls: Mutex::new(0),
        })
    }

    pub fn not_configured() -> Arc<Self> {
        Arc::new(Self {
            entities: Vec::new(),
            not_configured: true,
            calls: Mutex::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().expect("lock poisoned")
    }
}

#[async_trait]
impl PiiDetectionPort for FakeDetection {
    async fn detect_pii(&self, _text: &str) -> Result<Vec<PiiEntity>, DetectionError> {
        *self.calls.lock().expect("lock poisoned") += 1;
        if self.not_configured {
            return Err(DetectionError::NotConfigured);
        }
        Ok(self.entities.clone())
    }
}

pub enum StoreBehavior {
    Succeed,
    NotConfigured,
    FailUpload,
}

/// In-memory blob store keyed by (container, blob name).
pub struct InMemoryBlobStore {
    behavior: StoreBehavior,
    blobs: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new(behavior: StoreBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            blobs: Mutex::new(HashMap::new()),
        })
    }

    pub fn blob(&self, container: &str, name: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .expect("lock poisoned")
            .get(&(container.to_string(), name.to_string()))
            .cloned()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl BlobStorePort for InMemoryBlobStore {
    async fn store(&self, artifact: StoredArtifact) -> Result<(), StorageError> {
        match self.behavior {
            StoreBehavior::NotConfigured => Err(StorageError::NotConfigured),
            StoreBehavior::FailUpload => {
                Err(StorageError::Upload("simulated write failure".to_string()))
            }
            StoreBehavior::Succeed => {
                self.blobs.lock().expect("lock poisoned").insert(
                    (artifact.container_name.clone(), artifact.blob_name.clone()),
                    artifact.content,
                );
                Ok(())
            }
        }
    }
}

pub fn person_entity(offset: usize, length: usize) -> PiiEntity {
    PiiEntity {
        text: String::new(),
        category: "Person".to_string(),
        subcategory: None,
        confidence_score: 0.97,
        offset,
        length,
    }
}

/// Bind the real router on an ephemeral port with injected fake ports.
pub async fn setup_test_server(
    detection: Arc<FakeDetection>,
    store: Arc<InMemoryBlobStore>,
) -> Result<(String, Client), Box<dyn std::error::Error>> {
    let app = Application::with_ports(AppConfig::default(), detection, store);
    let router = create_router(app.state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok((format!("http://{addr}"), Client::new()))
}
