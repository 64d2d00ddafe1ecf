//! Customer-facing routes, mounted at `/public/shortlists`. The share token
//! in the path is the only thing identifying the caller.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public_shortlist;
use crate::state::AppState;

/// ```text
/// GET    /{token}             view
/// POST   /{token}/finalize    finalize
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(public_shortlist::view))
        .route("/{token}/finalize", post(public_shortlist::finalize))
}
