pub mod facility;
pub mod health;
pub mod slot;
pub mod slot_request;
pub mod vehicle_entry;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /facilities                          list, create
/// /facilities/{id}                     get, update, delete
///
/// /slots                               list, create
/// /slots/{id}                          get, update, delete
///
/// /slot-requests                       list, create
/// /slot-requests/{id}                  get
/// /slot-requests/{id}/cancel           cancel (owner)
/// /slot-requests/{id}/approve          approve (admin)
/// /slot-requests/{id}/reject           reject (admin)
///
/// /entries                             list, record entry
/// /entries/{id}                        get
/// /entries/{id}/exit                   record exit
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/facilities", facility::router())
        .nest("/slots", slot::router())
        .nest("/slot-requests", slot_request::router())
        .nest("/entries", vehicle_entry::router())
}
