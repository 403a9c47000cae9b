//! Blob storage client for uploaded documents.
//!
//! Uploads are transferred to the storage service by the frontend; the API
//! only needs two operations, expressed by the [`BlobStore`] trait: signing
//! short-lived preview URLs and deleting objects when a document row goes
//! away.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use atelier_core::error::CoreError;

use crate::config::StorageConfig;

/// Outbound interface to the blob storage service.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Produce a short-lived signed URL for an object path.
    async fn signed_url(&self, path: &str) -> Result<String, CoreError>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, path: &str) -> Result<(), CoreError>;
}

/// HTTP client for the real storage API.
pub struct HttpBlobStore {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpBlobStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn signed_url(&self, path: &str) -> Result<String, CoreError> {
        let response = self
            .client
            .post(format!(
                "{}/object/sign/{}/{}",
                self.config.api_base, self.config.bucket, path
            ))
            .bearer_auth(&self.config.service_key)
            .json(&json!({ "expiresIn": self.config.signed_url_ttl_secs }))
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("Storage sign request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "Storage returned {status}: {detail}"
            )));
        }

        let sign: SignResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(format!("Invalid storage response: {e}")))?;

        // The service returns a path relative to its API base.
        Ok(format!("{}{}", self.config.api_base, sign.signed_url))
    }

    async fn delete(&self, path: &str) -> Result<(), CoreError> {
        let response = self
            .client
            .delete(format!(
                "{}/object/{}/{}",
                self.config.api_base, self.config.bucket, path
            ))
            .bearer_auth(&self.config.service_key)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("Storage delete request failed: {e}")))?;

        // 404 means the object is already gone, which is fine.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "Storage returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}
