//! Staff shortlist routes, mounted at `/shortlists`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::shortlist;
use crate::handlers::shortlist_version as version;
use crate::state::AppState;

/// ```text
/// GET    /{id}                               get_by_id
/// PUT    /{id}                               update
/// DELETE /{id}                               delete
/// PUT    /{id}/items                         save_items
/// POST   /{id}/publish                       publish
/// POST   /{id}/revise                        revise
/// POST   /{id}/send-back                     send_back
/// POST   /{id}/procure                       procure
///
/// GET    /{id}/versions                      list_by_shortlist
/// GET    /{id}/versions/{version_number}     get_by_number
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(shortlist::get_by_id)
                .put(shortlist::update)
                .delete(shortlist::delete),
        )
        .route("/{id}/items", put(shortlist::save_items))
        .route("/{id}/publish", post(shortlist::publish))
        .route("/{id}/revise", post(shortlist::revise))
        .route("/{id}/send-back", post(shortlist::send_back))
        .route("/{id}/procure", post(shortlist::procure))
        .route("/{id}/versions", get(version::list_by_shortlist))
        .route("/{id}/versions/{version_number}", get(version::get_by_number))
}
