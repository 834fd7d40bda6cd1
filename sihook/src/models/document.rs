//! Documents produced for the search index

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::record::{DatasetRecord, Extra, Resource};

/// Geographic centre of a dataset's spatial extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpatialCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Flat metadata document derived from a dataset record
///
/// Serialized to a JSON string and embedded in the index document.
/// Optional fields are only written once derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataDocument {
    pub state: Value,
    pub private: Value,
    pub name: String,
    pub has_open: bool,
    pub has_closed: bool,
    pub resources_licenses: Vec<String>,
    pub has_access_url: bool,
    pub has_formats: bool,
    pub has_data_service: bool,
    pub has_hvd: bool,
    pub author: Value,
    pub author_email: Value,
    pub maintainer: Value,
    pub maintainer_email: Value,
    pub groups: Value,
    pub notes: Value,
    pub metadata_created: Value,
    pub metadata_modified: Value,
    pub dct_modified_fallback_ckan: Value,
    #[serde(rename = "type")]
    pub dataset_type: Option<String>,
    pub owner_org: Value,
    pub resources: Vec<Resource>,
    pub extras: Vec<Extra>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dct_issued: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dct_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundingbox: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_center: Option<SpatialCenter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hvd_category: Option<Vec<Value>>,

    /// Extras copied under their own key
    #[serde(flatten)]
    pub passthrough: BTreeMap<String, Value>,
}

impl MetadataDocument {
    /// Start a document from the record's verbatim fields
    ///
    /// Aggregated flags start out false and lists empty.
    pub fn from_record(record: &DatasetRecord) -> Self {
        Self {
            state: record.state.clone(),
            private: record.private.clone(),
            name: record.name.clone(),
            has_open: false,
            has_closed: false,
            resources_licenses: Vec::new(),
            has_access_url: false,
            has_formats: false,
            has_data_service: false,
            has_hvd: false,
            author: record.author.clone(),
            author_email: record.author_email.clone(),
            maintainer: record.maintainer.clone(),
            maintainer_email: record.maintainer_email.clone(),
            groups: record.groups.clone(),
            notes: record.notes.clone(),
            metadata_created: record.metadata_created.clone(),
            metadata_modified: record.metadata_modified.clone(),
            dct_modified_fallback_ckan: record.metadata_modified.clone(),
            dataset_type: record.dataset_type.clone(),
            owner_org: record.owner_org.clone(),
            resources: Vec::new(),
            extras: Vec::new(),
            temporal_start: None,
            temporal_end: None,
            dct_issued: None,
            dct_modified: None,
            boundingbox: None,
            spatial_area: None,
            spatial_center: None,
            hvd_category: None,
            passthrough: BTreeMap::new(),
        }
    }
}

/// Document body inside an index entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedDocument {
    pub id: String,
    pub title: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preamble: Option<Value>,
    pub sprache: Option<String>,
    pub sections: Vec<Value>,
    pub tags: Value,
    pub mandant: u32,
    /// Metadata document serialized as JSON text
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targetlink: Option<String>,
}

/// One element of the array sent to the index
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub index_name: String,
    #[serde(rename = "type")]
    pub dataset_type: Option<String>,
    pub version: Option<String>,
    pub display_name: Option<String>,
    pub document: IndexedDocument,
}

impl IndexEntry {
    /// Entry adding or replacing a dataset's document
    pub fn for_add(
        index_name: &str,
        record: &DatasetRecord,
        metadata: String,
        targetlink: String,
    ) -> Self {
        Self {
            index_name: index_name.to_string(),
            dataset_type: record.dataset_type.clone(),
            version: None,
            display_name: None,
            document: IndexedDocument {
                id: record.id.clone(),
                title: record.title.clone(),
                preamble: Some(record.notes.clone()),
                sprache: None,
                sections: Vec::new(),
                tags: record.tags.clone(),
                mandant: 1,
                metadata: Some(metadata),
                targetlink: Some(targetlink),
            },
        }
    }

    /// Entry removing a dataset's document
    pub fn for_delete(index_name: &str, id: &str, dataset_type: Option<String>) -> Self {
        Self {
            index_name: index_name.to_string(),
            dataset_type,
            version: None,
            display_name: None,
            document: IndexedDocument {
                id: id.to_string(),
                title: Value::Null,
                preamble: None,
                sprache: None,
                sections: Vec::new(),
                tags: Value::Array(Vec::new()),
                mandant: 1,
                metadata: None,
                targetlink: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_are_omitted() {
        let record = DatasetRecord {
            id: "abc".to_string(),
            name: "test-name".to_string(),
            ..DatasetRecord::default()
        };
        let value = serde_json::to_value(MetadataDocument::from_record(&record)).unwrap();

        assert_eq!(value["name"], "test-name");
        assert_eq!(value["has_open"], false);
        assert_eq!(value["resources_licenses"], json!([]));
        assert!(value.get("temporal_start").is_none());
        assert!(value.get("spatial_center").is_none());
        assert!(value.get("hvd_category").is_none());
    }

    #[test]
    fn test_passthrough_fields_are_flattened() {
        let mut document = MetadataDocument::from_record(&DatasetRecord::default());
        document
            .passthrough
            .insert("contact_name".to_string(), json!("Jane"));

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["contact_name"], "Jane");
    }

    #[test]
    fn test_delete_entry_shape() {
        let entry = IndexEntry::for_delete("test-index", "abc", Some("dataset".to_string()));
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            json!({
                "indexName": "test-index",
                "type": "dataset",
                "version": null,
                "displayName": null,
                "document": {
                    "id": "abc",
                    "title": null,
                    "sprache": null,
                    "sections": [],
                    "tags": [],
                    "mandant": 1,
                    "metadata": null
                }
            })
        );
    }
}
