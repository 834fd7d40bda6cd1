//! Hook endpoints called by the catalog
//!
//! `POST /hooks/before-index` receives the record about to be indexed and
//! hands it back unchanged; `POST /hooks/after-delete` receives the id of a
//! deleted dataset.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::DatasetRecord;
use crate::{ApiError, ApiResult, AppState};

/// Body of an after-delete notification
#[derive(Debug, Deserialize)]
pub struct DeletedDataset {
    pub id: String,
}

/// POST /hooks/before-index
///
/// **Response:** the record exactly as received, whatever the index did.
///
/// **Errors:**
/// - 400: body is not a dataset record, or its payload is incomplete
/// - 404: dataset could not be resolved for the delete step
/// - 500: search index configuration missing or malformed
pub async fn before_index(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let record: DatasetRecord = serde_json::from_value(body.clone())
        .map_err(|e| ApiError::BadRequest(format!("Not a dataset record: {}", e)))?;

    let decision = state.controller.before_index(&record).await?;
    debug!(id = %record.id, decision = ?decision, "before_index finished");

    Ok(Json(body))
}

/// POST /hooks/after-delete
///
/// **Request:** `{"id": "<id or name>"}`
/// **Response:** 204, also when the index was unreachable
pub async fn after_delete(
    State(state): State<AppState>,
    Json(body): Json<DeletedDataset>,
) -> ApiResult<StatusCode> {
    let outcome = state.controller.after_delete(&body.id).await?;
    debug!(id = %body.id, outcome = ?outcome, "after_delete finished");

    Ok(StatusCode::NO_CONTENT)
}

/// Build hook routes
pub fn hook_routes() -> Router<AppState> {
    Router::new()
        .route("/hooks/before-index", post(before_index))
        .route("/hooks/after-delete", post(after_delete))
}
