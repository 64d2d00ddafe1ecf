//! Staff handlers for shortlists and their draft lineage.
//!
//! Every state-changing endpoint delegates to [`ShortlistWorkflow`], which
//! runs the guard checks and the writes in one transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use frond_core::share_token::share_url;
use frond_core::types::DbId;
use frond_db::models::shortlist::{CreateShortlist, ShortlistView, UpdateShortlist};
use frond_db::models::shortlist_item::SaveDraft;
use frond_db::models::shortlist_version::PublishOutcome;
use frond_db::workflow::ShortlistWorkflow;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Staff read model plus the customer link for the latest sent version.
#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    #[serde(flatten)]
    pub shortlist: ShortlistView,
    pub share_url: Option<String>,
}

/// Publish result plus the link to send to the customer.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    #[serde(flatten)]
    pub outcome: PublishOutcome,
    pub share_url: String,
}

// ---------------------------------------------------------------------------
// GET /customers/{customer_id}/shortlists
// ---------------------------------------------------------------------------

/// List a customer's shortlists with their displayed statuses.
pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let shortlists = ShortlistWorkflow::list_for_customer(&state.pool, customer_id).await?;

    tracing::debug!(
        count = shortlists.len(),
        customer_id,
        "Listed shortlists for customer"
    );

    Ok(Json(DataResponse { data: shortlists }))
}

// ---------------------------------------------------------------------------
// POST /customers/{customer_id}/shortlists
// ---------------------------------------------------------------------------

pub async fn create(
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    AppJson(body): AppJson<CreateShortlist>,
) -> AppResult<impl IntoResponse> {
    let shortlist = ShortlistWorkflow::create(&state.pool, customer_id, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: shortlist })))
}

// ---------------------------------------------------------------------------
// GET /shortlists/{id}
// ---------------------------------------------------------------------------

/// Read a shortlist with the item set staff should see.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let shortlist = ShortlistWorkflow::read(&state.pool, id).await?;
    let share_url = shortlist
        .share_token
        .as_deref()
        .map(|token| share_url(&state.config.public_base_url, token));

    Ok(Json(DataResponse {
        data: ShortlistResponse {
            shortlist,
            share_url,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /shortlists/{id}
// ---------------------------------------------------------------------------

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(body): AppJson<UpdateShortlist>,
) -> AppResult<impl IntoResponse> {
    let shortlist = ShortlistWorkflow::update_details(&state.pool, id, &body).await?;
    Ok(Json(DataResponse { data: shortlist }))
}

// ---------------------------------------------------------------------------
// DELETE /shortlists/{id}
// ---------------------------------------------------------------------------

/// Delete a shortlist that was never sent to the customer.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ShortlistWorkflow::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /shortlists/{id}/items
// ---------------------------------------------------------------------------

/// Apply a batch of draft edits. Each accepted batch advances the version
/// counter by one.
pub async fn save_items(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(body): AppJson<SaveDraft>,
) -> AppResult<impl IntoResponse> {
    let outcome = ShortlistWorkflow::save_draft(&state.pool, id, &body).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /shortlists/{id}/publish
// ---------------------------------------------------------------------------

/// Send the draft to the customer as a new version.
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = ShortlistWorkflow::publish(&state.pool, id).await?;
    let share_url = share_url(&state.config.public_base_url, &outcome.share_token);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PublishResponse { outcome, share_url },
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /shortlists/{id}/revise
// ---------------------------------------------------------------------------

pub async fn revise(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = ShortlistWorkflow::revise(&state.pool, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /shortlists/{id}/send-back
// ---------------------------------------------------------------------------

pub async fn send_back(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = ShortlistWorkflow::send_back(&state.pool, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /shortlists/{id}/procure
// ---------------------------------------------------------------------------

pub async fn procure(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let shortlist = ShortlistWorkflow::mark_procured(&state.pool, id).await?;
    Ok(Json(DataResponse { data: shortlist }))
}
