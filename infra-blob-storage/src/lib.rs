//! Cleaned-transcript persistence against the Azure Blob Storage REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::StatusCode;

use redaction_domain::{BlobStorePort, StorageError, StoredArtifact};

pub mod connection;
pub mod signing;

pub use connection::{BlobConnection, BlobCredentials};

const X_MS_VERSION: &str = "2021-08-06";

#[derive(Debug, Clone)]
pub struct BlobAdapterConfig {
    pub connection_string: Option<String>,
    pub request_timeout: Duration,
}

pub struct BlobStorageAdapter {
    client: reqwest::Client,
    config: BlobAdapterConfig,
}

impl BlobStorageAdapter {
    pub fn new(config: BlobAdapterConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create the container; an already-existing container is success.
    async fn ensure_container(
        &self,
        connection: &BlobConnection,
        container: &str,
    ) -> Result<(), StorageError> {
        let url = connection.container_url(container);
        let date = signing::rfc1123_now();

        let mut request = self
            .client
            .put(&url)
            .timeout(self.config.request_timeout)
            .header(CONTENT_LENGTH, 0)
            .header("x-ms-date", &date)
            .header("x-ms-version", X_MS_VERSION);
        if let BlobCredentials::SharedKey { account, key } = &connection.credentials {
            let to_sign = signing::string_to_sign(
                "PUT",
                0,
                "",
                &[("x-ms-date", date.as_str()), ("x-ms-version", X_MS_VERSION)],
                &format!("/{account}/{container}\nrestype:container"),
            );
            request = request.header(
                AUTHORIZATION,
                signing::shared_key_authorization(account, key, &to_sign)?,
            );
        }

        let response = request
            .send()
            .await
            .map_err(|err| StorageError::Container(format!("request failed: {err}")))?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!(container, "created container");
                Ok(())
            }
            StatusCode::CONFLICT => Ok(()),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(StorageError::Container(format!("HTTP {status}: {detail}")))
            }
        }
    }

    async fn put_blob(
        &self,
        connection: &BlobConnection,
        artifact: &StoredArtifact,
    ) -> Result<(), StorageError> {
        let url = connection.blob_url(&artifact.container_name, &artifact.blob_name);
        let date = signing::rfc1123_now();

        let mut request = self
            .client
            .put(&url)
            .timeout(self.config.request_timeout)
            .header(CONTENT_TYPE, artifact.content_type)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-date", &date)
            .header("x-ms-version", X_MS_VERSION);
        if let BlobCredentials::SharedKey { account, key } = &connection.credentials {
            let to_sign = signing::string_to_sign(
                "PUT",
                artifact.content.len(),
                artifact.content_type,
                &[
                    ("x-ms-blob-type", "BlockBlob"),
                    ("x-ms-date", date.as_str()),
                    ("x-ms-version", X_MS_VERSION),
                ],
                &format!(
                    "/{account}/{}/{}",
                    artifact.container_name, artifact.blob_name
                ),
            );
            request = request.header(
                AUTHORIZATION,
                signing::shared_key_authorization(account, key, &to_sign)?,
            );
        }

        let response = request
            .body(artifact.content.clone())
            .send()
            .await
            .map_err(|err| StorageError::Upload(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StorageError::Upload(format!("HTTP {status}: {detail}")));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStorePort for BlobStorageAdapter {
    async fn store(&self, artifact: StoredArtifact) -> Result<(), StorageError> {
        let raw = self
            .config
            .connection_string
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(StorageError::NotConfigured)?;
        let connection = BlobConnection::parse(raw)?;

        self.ensure_container(&connection, &artifact.container_name)
            .await?;
        self.put_blob(&connection, &artifact).await?;

        tracing::info!(
            container = %artifact.container_name,
            blob = %artifact.blob_name,
            bytes = artifact.content.len(),
            "uploaded cleaned transcript"
        );
        Ok(())
    }
}
