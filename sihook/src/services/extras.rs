//! Classification of dataset extras
//!
//! Every extra is classified once into an [`ExtraKind`]; the assembler then
//! matches on the kind. Keys without a rule, and extras without a non-empty
//! string value, classify as [`ExtraKind::Ignored`].

use crate::models::Extra;

/// Legislation marking a dataset as high-value
pub const HVD_LEGISLATION_URI: &str = "http://data.europa.eu/eli/reg_impl/2023/138/oj";

/// Extras copied verbatim under their own key
pub const PASSTHROUGH_KEYS: [&str; 5] = [
    "contact_name",
    "contact_email",
    "maintainer_tel",
    "publisher_name",
    "politicalGeocodingLevelURI",
];

/// Extras holding a JSON list, copied raw when the list does not parse
pub const LIST_ENCODED_KEYS: [&str; 3] = ["contributorID", "geocodingText", "politicalGeocodingURI"];

/// Document field receiving a normalized date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    TemporalStart,
    TemporalEnd,
    Issued,
    Modified,
}

/// What an extra contributes to the metadata document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraKind<'a> {
    /// Primary geometry; sets bounding box, area and centre
    Spatial(&'a str),
    /// Bounding box geometry, used when no bounding box is set yet
    SpatialBbox(&'a str),
    /// Centroid geometry, used when no centre is set yet
    SpatialCentroid(&'a str),
    Date { field: DateField, value: &'a str },
    /// JSON list of legislation URIs
    ApplicableLegislation(&'a str),
    /// JSON list of high-value categories
    HvdCategory(&'a str),
    Passthrough { field: &'static str, value: &'a str },
    ListEncoded { field: &'static str, value: &'a str },
    Ignored,
}

impl<'a> ExtraKind<'a> {
    pub fn classify(extra: &'a Extra) -> Self {
        let (Some(key), Some(value)) = (extra.key(), extra.value()) else {
            return ExtraKind::Ignored;
        };
        if value.is_empty() {
            return ExtraKind::Ignored;
        }

        match key {
            "spatial" => ExtraKind::Spatial(value),
            "spatial_bbox" => ExtraKind::SpatialBbox(value),
            "spatial_centroid" => ExtraKind::SpatialCentroid(value),
            "temporal_start" => ExtraKind::Date {
                field: DateField::TemporalStart,
                value,
            },
            "temporal_end" => ExtraKind::Date {
                field: DateField::TemporalEnd,
                value,
            },
            "issued" => ExtraKind::Date {
                field: DateField::Issued,
                value,
            },
            "modified" => ExtraKind::Date {
                field: DateField::Modified,
                value,
            },
            "applicable_legislation" => ExtraKind::ApplicableLegislation(value),
            "hvd_category" => ExtraKind::HvdCategory(value),
            _ => {
                if let Some(field) = PASSTHROUGH_KEYS.into_iter().find(|k| *k == key) {
                    ExtraKind::Passthrough { field, value }
                } else if let Some(field) = LIST_ENCODED_KEYS.into_iter().find(|k| *k == key) {
                    ExtraKind::ListEncoded { field, value }
                } else {
                    ExtraKind::Ignored
                }
            }
        }
    }
}
