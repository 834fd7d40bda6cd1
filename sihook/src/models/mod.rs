//! Data models for the search index hook
//!
//! - Dataset records as delivered by the catalog
//! - The derived metadata document and index wire entries
//! - The license openness snapshot

pub mod document;
pub mod license;
pub mod record;

pub use document::{IndexEntry, IndexedDocument, MetadataDocument, SpatialCenter};
pub use license::{LicenseOpenness, LicenseRecord};
pub use record::{DatasetPayload, DatasetRecord, Extra, ResolvedPackage, Resource};
