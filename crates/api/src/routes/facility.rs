//! Route definitions for the facility registry.

use axum::routing::get;
use axum::Router;

use crate::handlers::facility;
use crate::state::AppState;

/// Routes mounted at `/facilities`.
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
        .route("/", get(facility::list).post(facility::create))
        .route(
            "/{id}",
            get(facility::get_by_id)
                .put(facility::update)
                .delete(facility::delete),
        )
}
