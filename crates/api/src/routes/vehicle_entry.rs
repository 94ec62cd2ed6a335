//! Route definitions for the entry/exit ledger.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vehicle_entry;
use crate::state::AppState;

/// Routes mounted at `/entries`.
///
/// ```text
/// GET  /              -> list
/// POST /              -> record_entry (attendant/admin)
/// GET  /{id}          -> get_by_id
/// POST /{id}/exit     -> record_exit (attendant/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(vehicle_entry::list).post(vehicle_entry::record_entry),
        )
        .route("/{id}", get(vehicle_entry::get_by_id))
        .route("/{id}/exit", post(vehicle_entry::record_exit))
}
