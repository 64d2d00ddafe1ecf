//! Customer-scoped shortlist routes, mounted at `/customers`.

use axum::routing::get;
use axum::Router;

use crate::handlers::shortlist;
use crate::state::AppState;

/// ```text
/// GET    /{customer_id}/shortlists    list_by_customer
/// POST   /{customer_id}/shortlists    create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{customer_id}/shortlists",
        get(shortlist::list_by_customer).post(shortlist::create),
    )
}
