//! Handlers for browsing a shortlist's sent versions.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use frond_core::types::{DbId, VersionNumber};
use frond_db::workflow::ShortlistWorkflow;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /shortlists/{id}/versions
pub async fn list_by_shortlist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = ShortlistWorkflow::list_versions(&state.pool, id).await?;
    tracing::debug!(count = versions.len(), shortlist_id = id, "Listed shortlist versions");
    Ok(Json(DataResponse { data: versions }))
}

/// GET /shortlists/{id}/versions/{version_number}
pub async fn get_by_number(
    State(state): State<AppState>,
    Path((id, version_number)): Path<(DbId, VersionNumber)>,
) -> AppResult<impl IntoResponse> {
    let version = ShortlistWorkflow::get_version(&state.pool, id, version_number).await?;
    Ok(Json(DataResponse { data: version }))
}
