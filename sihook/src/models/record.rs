//! Dataset records as delivered by the catalog

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HookError, HookResult};

/// Dataset record handed to the hook
///
/// Fields copied verbatim into the metadata document are kept as raw JSON,
/// since the catalog is not strict about their types. Missing fields read
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: Value,
    /// Declared dataset type; absent means the record cannot be indexed
    #[serde(rename = "type", default)]
    pub dataset_type: Option<String>,
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub private: Value,
    #[serde(default)]
    pub notes: Value,
    #[serde(default)]
    pub author: Value,
    #[serde(default)]
    pub author_email: Value,
    #[serde(default)]
    pub maintainer: Value,
    #[serde(default)]
    pub maintainer_email: Value,
    #[serde(default)]
    pub groups: Value,
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub owner_org: Value,
    #[serde(default)]
    pub metadata_created: Value,
    #[serde(default)]
    pub metadata_modified: Value,
    /// Serialized payload holding `resources` and `extras`
    #[serde(default)]
    pub data_dict: Option<String>,
}

/// Resources and extras decoded from `data_dict`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetPayload {
    pub resources: Vec<Resource>,
    pub extras: Vec<Extra>,
}

impl DatasetRecord {
    /// Decode the embedded payload
    ///
    /// Fails when `data_dict` is missing, is not a JSON object, or lacks
    /// either the `resources` or the `extras` key.
    pub fn payload(&self) -> HookResult<DatasetPayload> {
        let raw = self.data_dict.as_deref().ok_or_else(|| {
            HookError::Payload("Dictionary does not contain key 'data_dict'".to_string())
        })?;

        let decoded: Map<String, Value> = serde_json::from_str(raw)
            .map_err(|e| HookError::Payload(format!("'data_dict' is not a JSON object: {}", e)))?;

        let resources = mandatory_list(&decoded, "resources")?;
        let extras = mandatory_list(&decoded, "extras")?;

        Ok(DatasetPayload { resources, extras })
    }
}

fn mandatory_list<T: serde::de::DeserializeOwned>(
    decoded: &Map<String, Value>,
    key: &str,
) -> HookResult<Vec<T>> {
    let value = decoded
        .get(key)
        .ok_or_else(|| HookError::Payload(format!("Dictionary does not contain key '{}'", key)))?;

    serde_json::from_value(value.clone())
        .map_err(|e| HookError::Payload(format!("'{}' is not a list of objects: {}", key, e)))
}

/// Text of a field when it is a JSON string
fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Text of a field when it is a non-empty JSON string
fn non_empty<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    str_field(fields, key).filter(|v| !v.is_empty())
}

/// A distributed file or service attached to a dataset
///
/// No field is mandatory; all fields are preserved for the output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
    /// License id; non-string values are not license ids and count as absent
    pub fn license(&self) -> Option<&str> {
        str_field(&self.0, "license")
    }

    pub fn format(&self) -> Option<&str> {
        str_field(&self.0, "format")
    }

    pub fn set_format(&mut self, format: String) {
        self.0.insert("format".to_string(), Value::String(format));
    }

    /// Non-empty media type or format
    pub fn has_format(&self) -> bool {
        non_empty(&self.0, "mimetype").is_some() || non_empty(&self.0, "format").is_some()
    }

    pub fn access_url(&self) -> Option<&str> {
        non_empty(&self.0, "access_url")
    }

    pub fn url(&self) -> Option<&str> {
        non_empty(&self.0, "url")
    }

    pub fn download_url(&self) -> Option<&str> {
        non_empty(&self.0, "download_url")
    }

    /// Raw access service list (serialized JSON or an inline array)
    pub fn access_services(&self) -> Option<&Value> {
        self.0.get("access_services")
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A key-value pair attached to a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extra(Map<String, Value>);

impl Extra {
    /// Build an extra from key and value
    pub fn new(key: &str, value: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("key".to_string(), Value::String(key.to_string()));
        fields.insert("value".to_string(), Value::String(value.to_string()));
        Self(fields)
    }

    pub fn key(&self) -> Option<&str> {
        str_field(&self.0, "key")
    }

    pub fn value(&self) -> Option<&str> {
        str_field(&self.0, "value")
    }
}

impl From<Map<String, Value>> for Extra {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Canonical dataset identity returned by the package resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub id: String,
    #[serde(rename = "type", default)]
    pub dataset_type: Option<String>,
    #[serde(default)]
    pub name: String,
}
