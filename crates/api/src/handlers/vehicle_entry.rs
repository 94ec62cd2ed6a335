//! Handlers for the `/entries` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkfleet_core::error::CoreError;
use parkfleet_core::types::DbId;
use parkfleet_db::models::vehicle_entry::{EntryListQuery, RecordEntry, VehicleEntry};
use parkfleet_db::repositories::VehicleEntryRepo;

use crate::error::AppResult;
use crate::middleware::{AuthUser, RequireAttendant};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/entries (attendant/admin)
pub async fn record_entry(
    State(state): State<AppState>,
    RequireAttendant(user): RequireAttendant,
    Json(input): Json<RecordEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<VehicleEntry>>)> {
    let entry = VehicleEntryRepo::record_entry(&state.pool, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// POST /api/v1/entries/{id}/exit (attendant/admin)
pub async fn record_exit(
    State(state): State<AppState>,
    RequireAttendant(user): RequireAttendant,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VehicleEntry>>> {
    let exited = VehicleEntryRepo::record_exit(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: exited }))
}

/// GET /api/v1/entries
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<EntryListQuery>,
) -> AppResult<Json<DataResponse<Vec<VehicleEntry>>>> {
    let entries = VehicleEntryRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/entries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VehicleEntry>>> {
    let entry = VehicleEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VehicleEntry",
            id,
        })?;
    Ok(Json(DataResponse { data: entry }))
}
