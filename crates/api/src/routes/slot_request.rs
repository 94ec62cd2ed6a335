//! Route definitions for the slot-request lifecycle.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::slot_request;
use crate::state::AppState;

/// Routes mounted at `/slot-requests`.
///
/// ```text
/// GET  /                 -> list (own requests; admin sees all)
/// POST /                 -> create
/// GET  /{id}             -> get_by_id (owner or admin)
/// POST /{id}/cancel      -> cancel (owner)
/// POST /{id}/approve     -> approve (admin)
/// POST /{id}/reject      -> reject (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(slot_request::list).post(slot_request::create))
        .route("/{id}", get(slot_request::get_by_id))
        .route("/{id}/cancel", post(slot_request::cancel))
        .route("/{id}/approve", post(slot_request::approve))
        .route("/{id}/reject", post(slot_request::reject))
}
