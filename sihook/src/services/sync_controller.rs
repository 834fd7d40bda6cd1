//! Index synchronization for dataset change events
//!
//! **before_index:** eligibility gate, then delete followed by add for the
//! same dataset. The delete is idempotent, so the add runs even when the
//! delete step failed.
//!
//! **after_delete:** resolve the identifier, then delete.
//!
//! Transport failures are logged and reported per step; they never fail
//! the host operation. Configuration, payload and resolution errors are
//! returned to the caller.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::{HookError, HookResult};
use crate::models::{DatasetRecord, LicenseOpenness};
use crate::services::catalog_client::PackageResolver;
use crate::services::index_gateway::IndexGateway;
use crate::services::metadata_assembler::MetadataAssembler;

/// Outcome of one saga step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// Transport failure, already logged
    Failed(String),
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed)
    }
}

/// Per-step outcome of a delete-then-add run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub delete: StepOutcome,
    pub add: StepOutcome,
}

/// What `before_index` did with a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexDecision {
    /// Record carries no type
    MissingType,
    /// Type not in the allow-list
    NotIndexable(String),
    Synced(SyncReport),
}

/// Keeps the search index in step with catalog changes
pub struct IndexSyncController {
    gateway: IndexGateway,
    resolver: Arc<dyn PackageResolver>,
    openness: Arc<LicenseOpenness>,
}

impl IndexSyncController {
    pub fn new(
        gateway: IndexGateway,
        resolver: Arc<dyn PackageResolver>,
        openness: Arc<LicenseOpenness>,
    ) -> Self {
        Self {
            gateway,
            resolver,
            openness,
        }
    }

    pub fn openness(&self) -> &LicenseOpenness {
        &self.openness
    }

    /// Hook point run before the catalog indexes a record
    pub async fn before_index(&self, record: &DatasetRecord) -> HookResult<IndexDecision> {
        debug!(id = %record.id, "Syncing before indexing");

        let Some(dataset_type) = record.dataset_type.as_deref() else {
            error!(id = %record.id, "No package / dataset type set");
            return Ok(IndexDecision::MissingType);
        };

        if !self.gateway.config().should_be_indexed(dataset_type)? {
            info!("Skipping non indexable type: {}", dataset_type);
            return Ok(IndexDecision::NotIndexable(dataset_type.to_string()));
        }

        let delete = self.delete_from_index(&record.id).await?;
        let add = self.add_to_index(record).await?;

        Ok(IndexDecision::Synced(SyncReport { delete, add }))
    }

    /// Hook point run after the catalog deleted a dataset
    pub async fn after_delete(&self, identifier: &str) -> HookResult<StepOutcome> {
        debug!(id = %identifier, "Syncing after package deletion");
        self.delete_from_index(identifier).await
    }

    /// Resolve the identifier and delete the dataset's document
    pub async fn delete_from_index(&self, identifier: &str) -> HookResult<StepOutcome> {
        self.gateway.endpoint()?;
        self.gateway.config().credentials()?;

        let package = match self.resolver.resolve(identifier.trim()).await {
            Ok(package) => package,
            Err(e) => {
                error!("Dataset for id {} was not found", identifier);
                return Err(e);
            }
        };

        let outcome = contain_transport(self.gateway.delete(&package).await)?;
        if outcome.is_completed() {
            debug!(id = %package.id, name = %package.name, "Deleted from index");
        }
        Ok(outcome)
    }

    /// Assemble the metadata document and add it to the index
    pub async fn add_to_index(&self, record: &DatasetRecord) -> HookResult<StepOutcome> {
        self.gateway.config().assert_configuration()?;
        self.gateway.endpoint()?;

        let metadata = MetadataAssembler::new(&self.openness).assemble(record)?;
        contain_transport(self.gateway.add(record, &metadata).await)
    }
}

/// Turn a transport failure into a logged step outcome
fn contain_transport(result: HookResult<()>) -> HookResult<StepOutcome> {
    match result {
        Ok(()) => Ok(StepOutcome::Completed),
        Err(HookError::Transport(e)) => {
            error!("{}", e);
            Ok(StepOutcome::Failed(e.to_string()))
        }
        Err(e) => Err(e),
    }
}
