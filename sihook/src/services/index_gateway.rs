//! Search index wire calls

use sihook_common::config::SearchIndexConfig;
use std::time::Duration;
use tracing::debug;

use crate::error::{HookError, HookResult, TransportError};
use crate::models::{DatasetRecord, IndexEntry, MetadataDocument, ResolvedPackage};

/// Sends add and delete requests to the search index
///
/// Configuration is read on every call, so a misconfigured value surfaces
/// as a configuration error at the first request needing it.
pub struct IndexGateway {
    http_client: reqwest::Client,
    config: SearchIndexConfig,
}

impl IndexGateway {
    pub fn new(config: SearchIndexConfig) -> HookResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &SearchIndexConfig {
        &self.config
    }

    /// Configured endpoint, checked to be an absolute http(s) URL
    pub fn endpoint(&self) -> HookResult<String> {
        let endpoint = self.config.endpoint()?;
        let url = reqwest::Url::parse(&endpoint).map_err(|e| {
            sihook_common::Error::Config(format!("Configured endpoint is not a URL: {}", e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(endpoint),
            scheme => Err(sihook_common::Error::Config(format!(
                "Configured endpoint has unsupported scheme: {}",
                scheme
            ))
            .into()),
        }
    }

    /// Add (or replace) a dataset's document
    pub async fn add(&self, record: &DatasetRecord, metadata: &MetadataDocument) -> HookResult<()> {
        let endpoint = self.endpoint()?;
        let credentials = self.config.credentials()?;

        let metadata = serde_json::to_string(metadata)
            .map_err(|e| HookError::Payload(format!("Metadata not serializable: {}", e)))?;
        let entry = IndexEntry::for_add(
            self.config.index_name()?,
            record,
            metadata,
            self.config.targetlink_for(&record.name)?,
        );

        debug!(endpoint = %endpoint, id = %record.id, "Adding to index");

        let response = self
            .http_client
            .post(&endpoint)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&[entry])
            .send()
            .await
            .map_err(TransportError::from)?;

        check_status(response).await
    }

    /// Remove a dataset's document
    pub async fn delete(&self, package: &ResolvedPackage) -> HookResult<()> {
        let url = format!("{}{}", self.endpoint()?, package.id);
        let credentials = self.config.credentials()?;
        let entry = IndexEntry::for_delete(
            self.config.index_name()?,
            &package.id,
            package.dataset_type.clone(),
        );

        debug!(url = %url, id = %package.id, name = %package.name, "Deleting from index");

        let response = self
            .http_client
            .delete(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&[entry])
            .send()
            .await
            .map_err(TransportError::from)?;

        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> HookResult<()> {
    let status = response.status();
    debug!(status = status.as_u16(), "Index response");

    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    }
    .into())
}
