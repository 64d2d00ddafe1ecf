pub mod customer;
pub mod health;
pub mod public;
pub mod shortlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /customers/{customer_id}/shortlists              list, create
///
/// /shortlists/{id}                                 read, update details, delete
/// /shortlists/{id}/items                           save draft (PUT)
/// /shortlists/{id}/publish                         send to customer (POST)
/// /shortlists/{id}/revise                          reopen as draft (POST)
/// /shortlists/{id}/send-back                       return to customer (POST)
/// /shortlists/{id}/procure                         mark for procurement (POST)
/// /shortlists/{id}/versions                        version history
/// /shortlists/{id}/versions/{version_number}       one version with items
///
/// /public/shortlists/{token}                       customer view
/// /public/shortlists/{token}/finalize              customer submission (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", customer::router())
        .nest("/shortlists", shortlist::router())
        .nest("/public/shortlists", public::router())
}
