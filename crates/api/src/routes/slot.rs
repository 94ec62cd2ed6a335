//! Route definitions for the slot registry.

use axum::routing::get;
use axum::Router;

use crate::handlers::slot;
use crate::state::AppState;

/// Routes mounted at `/slots`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create (admin)
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update (admin)
/// DELETE /{id}    -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(slot::list).post(slot::create))
        .route(
            "/{id}",
            get(slot::get_by_id).put(slot::update).delete(slot::delete),
        )
}
