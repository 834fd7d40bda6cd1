//! Catalog action API client
//!
//! Provides the two lookups the hook needs from the hosting catalog: the
//! license list (for openness) and package resolution (identifier or name
//! to the canonical record).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use sihook_common::config::CatalogConfig;
use std::time::Duration;
use tracing::debug;

use crate::error::{HookError, HookResult};
use crate::models::{LicenseRecord, ResolvedPackage};

const USER_AGENT: &str = concat!("sihook/", env!("CARGO_PKG_VERSION"));
const CATALOG_TIMEOUT_SECS: u64 = 30;

/// Source of license openness information
#[async_trait]
pub trait LicenseRegistry: Send + Sync {
    async fn license_list(&self) -> HookResult<Vec<LicenseRecord>>;
}

/// Resolves a dataset identifier or name to the canonical record
#[async_trait]
pub trait PackageResolver: Send + Sync {
    async fn resolve(&self, identifier: &str) -> HookResult<ResolvedPackage>;
}

/// Envelope of every action API response
#[derive(Debug, Deserialize)]
struct ActionResponse<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    error: Option<Value>,
}

/// Client for the catalog's `/api/3/action` endpoints
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> HookResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(CATALOG_TIMEOUT_SECS))
            .build()
            .map_err(|e| HookError::Registry(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url()?,
            api_token: config.api_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/api/3/action/{}", self.base_url, action)
    }

    /// Call an action and unwrap its `result`
    async fn call_action<T: DeserializeOwned>(
        &self,
        action: &str,
        query: &[(&str, &str)],
    ) -> Result<T, String> {
        let url = self.action_url(action);
        debug!(url = %url, "Calling catalog action");

        let mut request = self.http_client.get(&url).query(query);
        if let Some(token) = &self.api_token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();

        let envelope: ActionResponse<T> = response
            .json()
            .await
            .map_err(|e| format!("{} (status {})", e, status.as_u16()))?;

        match envelope {
            ActionResponse {
                success: true,
                result: Some(result),
                ..
            } => Ok(result),
            ActionResponse { error, .. } => Err(error
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("action failed with status {}", status.as_u16()))),
        }
    }
}

#[async_trait]
impl LicenseRegistry for CatalogClient {
    async fn license_list(&self) -> HookResult<Vec<LicenseRecord>> {
        self.call_action("license_list", &[])
            .await
            .map_err(HookError::Registry)
    }
}

#[async_trait]
impl PackageResolver for CatalogClient {
    async fn resolve(&self, identifier: &str) -> HookResult<ResolvedPackage> {
        let identifier = identifier.trim();

        self.call_action("package_show", &[("id", identifier)])
            .await
            .map_err(|reason| HookError::Resolution {
                id: identifier.to_string(),
                reason,
            })
    }
}
