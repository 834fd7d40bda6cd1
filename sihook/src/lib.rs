//! sihook library interface
//!
//! Search index hook for a dataset catalog: turns dataset records into flat
//! metadata documents and keeps an external search index in sync with the
//! catalog's add, update and delete events.

pub mod api;
pub mod dates;
pub mod error;
pub mod geometry;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult, HookError, HookResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::IndexSyncController;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<IndexSyncController>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(controller: IndexSyncController) -> Self {
        Self {
            controller: Arc::new(controller),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::hook_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
