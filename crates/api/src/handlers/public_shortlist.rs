//! Customer-facing handlers, addressed by share token.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use frond_db::models::shortlist_version::FinalizeShortlist;
use frond_db::workflow::ShortlistWorkflow;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /public/shortlists/{token}
pub async fn view(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let version = ShortlistWorkflow::view_public(&state.pool, &token).await?;
    Ok(Json(DataResponse { data: version }))
}

/// POST /public/shortlists/{token}/finalize
///
/// Seals the version with the customer's final quantities and notes. A
/// token can be finalized once.
pub async fn finalize(
    State(state): State<AppState>,
    Path(token): Path<String>,
    AppJson(body): AppJson<FinalizeShortlist>,
) -> AppResult<impl IntoResponse> {
    let outcome = ShortlistWorkflow::finalize(&state.pool, &token, &body).await?;
    Ok(Json(DataResponse { data: outcome }))
}
