//! Test Helper Utilities
//!
//! Shared fixtures and collaborator fakes for testing sihook

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::LogCapture;

use async_trait::async_trait;
use serde_json::{json, Value};
use sihook::models::{DatasetRecord, LicenseRecord, ResolvedPackage};
use sihook::services::{LicenseRegistry, PackageResolver};
use sihook::{HookError, HookResult};
use sihook_common::config::SearchIndexConfig;
use std::sync::Mutex;

pub const INDEX_NAME: &str = "test-index";
pub const USERNAME: &str = "testuser";
pub const PASSWORD: &str = "testpassword";

/// Complete search index configuration pointing at `endpoint`
pub fn index_config(endpoint: &str) -> SearchIndexConfig {
    SearchIndexConfig {
        endpoint: Some(endpoint.to_string()),
        credentials: Some(format!("{}:{}", USERNAME, PASSWORD)),
        indexable_types: Some("dataset, showcase".to_string()),
        targetlink_base_path: Some("/test/path".to_string()),
        index_name: Some(INDEX_NAME.to_string()),
        request_timeout_secs: 5,
    }
}

/// Raw JSON of a dataset record with the given resources and extras
pub fn record_json(resources: Value, extras: Value) -> Value {
    json!({
        "id": "f73d8b97-4e1a-4f3c-9c9a-3a4b6f0e2d11",
        "name": "test-name",
        "title": "Test Title",
        "type": "dataset",
        "state": "active",
        "private": false,
        "notes": "Some notes",
        "author": "Jane Doe",
        "author_email": "jane@example.com",
        "maintainer": "John Doe",
        "maintainer_email": "john@example.com",
        "groups": ["transport"],
        "tags": ["bus", "train"],
        "owner_org": "org-1",
        "metadata_created": "2017-01-01T10:00:00.000000",
        "metadata_modified": "2017-09-01T10:00:00.000000",
        "data_dict": json!({"resources": resources, "extras": extras}).to_string()
    })
}

/// Dataset record with the given resources and extras
pub fn record(resources: Value, extras: Value) -> DatasetRecord {
    serde_json::from_value(record_json(resources, extras)).unwrap()
}

pub fn license(id: &str, od_conformance: &str) -> LicenseRecord {
    LicenseRecord {
        id: id.to_string(),
        od_conformance: Some(od_conformance.to_string()),
        osd_conformance: Some("not reviewed".to_string()),
        ..LicenseRecord::default()
    }
}

/// Resolver answering every identifier with a fixed package
pub struct FakeResolver {
    package: Option<ResolvedPackage>,
    calls: Mutex<Vec<String>>,
}

impl FakeResolver {
    pub fn resolving(id: &str, dataset_type: &str, name: &str) -> Self {
        Self {
            package: Some(ResolvedPackage {
                id: id.to_string(),
                dataset_type: Some(dataset_type.to_string()),
                name: name.to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Resolver that finds nothing
    pub fn empty() -> Self {
        Self {
            package: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Identifiers passed to `resolve`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageResolver for FakeResolver {
    async fn resolve(&self, identifier: &str) -> HookResult<ResolvedPackage> {
        self.calls.lock().unwrap().push(identifier.to_string());
        self.package.clone().ok_or_else(|| HookError::Resolution {
            id: identifier.to_string(),
            reason: "Not found".to_string(),
        })
    }
}

/// Registry serving a fixed license list, or failing
pub struct StaticRegistry {
    licenses: Option<Vec<LicenseRecord>>,
}

impl StaticRegistry {
    pub fn with(licenses: Vec<LicenseRecord>) -> Self {
        Self {
            licenses: Some(licenses),
        }
    }

    pub fn failing() -> Self {
        Self { licenses: None }
    }
}

#[async_trait]
impl LicenseRegistry for StaticRegistry {
    async fn license_list(&self) -> HookResult<Vec<LicenseRecord>> {
        self.licenses
            .clone()
            .ok_or_else(|| HookError::Registry("registry offline".to_string()))
    }
}
