//! Pipeline services: aggregation, assembly, catalog access and index sync

pub mod catalog_client;
pub mod extras;
pub mod index_gateway;
pub mod metadata_assembler;
pub mod resource_aggregator;
pub mod sync_controller;

pub use catalog_client::{CatalogClient, LicenseRegistry, PackageResolver};
pub use extras::{DateField, ExtraKind};
pub use index_gateway::IndexGateway;
pub use metadata_assembler::MetadataAssembler;
pub use sync_controller::{IndexDecision, IndexSyncController, StepOutcome, SyncReport};
