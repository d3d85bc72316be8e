use async_trait::async_trait;

use crate::{DetectionError, PiiEntity, StorageError, StoredArtifact};

#[async_trait]
pub trait PiiDetectionPort: Send + Sync {
    async fn detect_pii(&self, text: &str) -> Result<Vec<PiiEntity>, DetectionError>;
}

#[async_trait]
pub trait BlobStorePort: Send + Sync {
    async fn store(&self, artifact: StoredArtifact) -> Result<(), StorageError>;
}
