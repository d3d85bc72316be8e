use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("pii detection endpoint or access key not configured")]
    NotConfigured,

    #[error("pii detection service failure: {0}")]
    ServiceFailure(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage connection string not configured")]
    NotConfigured,

    #[error("invalid storage connection string: {0}")]
    Connection(String),

    #[error("container creation failed: {0}")]
    Container(String),

    #[error("blob upload failed: {0}")]
    Upload(String),
}
