//! Metadata document assembly
//!
//! Builds the flat [`MetadataDocument`] for one dataset record: resource
//! aggregation first, then every extra in order. A bad extra is logged and
//! skipped; only a record without a usable payload fails assembly.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::dates::{parse_date, DateParseError, NORMALIZED_DATE_FORMAT};
use crate::error::HookResult;
use crate::geometry::{self, GeometryError};
use crate::models::{DatasetRecord, Extra, LicenseOpenness, MetadataDocument};
use crate::services::extras::{DateField, ExtraKind, HVD_LEGISLATION_URI};
use crate::services::resource_aggregator;

/// Why a single extra was skipped
#[derive(Debug, Error)]
enum ExtraError {
    #[error(transparent)]
    Date(#[from] DateParseError),

    #[error("invalid JSON list: {0}")]
    List(#[from] serde_json::Error),
}

/// Assembles metadata documents against a license openness snapshot
pub struct MetadataAssembler<'a> {
    openness: &'a LicenseOpenness,
}

impl<'a> MetadataAssembler<'a> {
    pub fn new(openness: &'a LicenseOpenness) -> Self {
        Self { openness }
    }

    /// Build the metadata document for a record
    ///
    /// Fails only when the record's payload is missing or incomplete.
    pub fn assemble(&self, record: &DatasetRecord) -> HookResult<MetadataDocument> {
        let payload = record.payload()?;
        let mut resources = payload.resources;
        resource_aggregator::shorten_resource_formats(&mut resources);

        let mut document = MetadataDocument::from_record(record);

        (document.has_open, document.has_closed) =
            resource_aggregator::aggregate_openness(&resources, self.openness);
        document.resources_licenses = resource_aggregator::aggregate_licenses(&resources);
        (document.has_access_url, document.has_formats) =
            resource_aggregator::aggregate_quality_metrics(&resources);
        document.has_data_service = resource_aggregator::aggregate_access_service(&resources);

        for extra in &payload.extras {
            apply_extra(&mut document, extra);
        }

        document.resources = resources;
        document.extras = payload.extras;

        Ok(document)
    }
}

fn apply_extra(document: &mut MetadataDocument, extra: &Extra) {
    let kind = ExtraKind::classify(extra);

    let result = match kind {
        ExtraKind::Spatial(value) => {
            apply_spatial(document, value);
            Ok(())
        }
        ExtraKind::SpatialBbox(value) => {
            apply_bbox(document, value);
            Ok(())
        }
        ExtraKind::SpatialCentroid(value) => {
            apply_centroid(document, value);
            Ok(())
        }
        ExtraKind::Date { field, value } => apply_date(document, field, value),
        ExtraKind::ApplicableLegislation(value) => parse_list(value).map(|legislation| {
            if legislation
                .iter()
                .any(|uri| uri.as_str() == Some(HVD_LEGISLATION_URI))
            {
                document.has_hvd = true;
            }
        }),
        ExtraKind::HvdCategory(value) => parse_list(value).map(|categories| {
            document.hvd_category = Some(categories);
        }),
        ExtraKind::Passthrough { field, value } => {
            document
                .passthrough
                .insert(field.to_string(), Value::String(value.to_string()));
            Ok(())
        }
        ExtraKind::ListEncoded { field, value } => {
            let stored = parse_list(value)
                .map(Value::Array)
                .unwrap_or_else(|_| Value::String(value.to_string()));
            document.passthrough.insert(field.to_string(), stored);
            Ok(())
        }
        ExtraKind::Ignored => Ok(()),
    };

    if let Err(e) = result {
        info!(
            key = extra.key().unwrap_or_default(),
            dataset = %document.name,
            value = extra.value().unwrap_or_default(),
            error = %e,
            "Invalid value in extras, skipping"
        );
    }
}

fn parse_list(value: &str) -> Result<Vec<Value>, ExtraError> {
    Ok(serde_json::from_str(value)?)
}

fn apply_date(
    document: &mut MetadataDocument,
    field: DateField,
    value: &str,
) -> Result<(), ExtraError> {
    let parsed = parse_date(value)?;
    let normalized = parsed.format(NORMALIZED_DATE_FORMAT).to_string();

    match field {
        DateField::TemporalStart => document.temporal_start = Some(normalized),
        DateField::TemporalEnd => document.temporal_end = Some(normalized),
        DateField::Issued => document.dct_issued = Some(normalized),
        DateField::Modified => {
            if sihook_common::time::is_before_now(&parsed) {
                document.dct_modified_fallback_ckan = Value::String(normalized.clone());
            }
            document.dct_modified = Some(normalized);
        }
    }
    Ok(())
}

fn apply_spatial(document: &mut MetadataDocument, value: &str) {
    match geometry::summarize(value, true) {
        Ok(summary) => {
            document.boundingbox = Some(summary.boundingbox);
            document.spatial_area = Some(summary.area);
            document.spatial_center = Some(summary.center);
        }
        Err(e) => log_invalid_geometry(document, "spatial", value, &e, true),
    }
}

fn apply_bbox(document: &mut MetadataDocument, value: &str) {
    if document.boundingbox.is_some() {
        return;
    }
    match geometry::summarize(value, false) {
        Ok(summary) => document.boundingbox = Some(summary.boundingbox),
        Err(e) => log_invalid_geometry(document, "spatial_bbox", value, &e, false),
    }
}

fn apply_centroid(document: &mut MetadataDocument, value: &str) {
    if document.spatial_center.is_some() {
        return;
    }
    match geometry::summarize(value, false) {
        Ok(summary) => document.spatial_center = Some(summary.center),
        Err(e) => log_invalid_geometry(document, "spatial_centroid", value, &e, false),
    }
}

fn log_invalid_geometry(
    document: &MetadataDocument,
    key: &str,
    value: &str,
    error: &GeometryError,
    primary: bool,
) {
    if primary {
        info!(key, dataset = %document.name, value, error = %error, "Invalid GeoJSON in extras");
    } else {
        debug!(key, dataset = %document.name, value, error = %error, "Invalid GeoJSON in extras");
    }
}
