//! Handlers for the `/slots` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkfleet_core::error::CoreError;
use parkfleet_core::types::DbId;
use parkfleet_db::models::slot::{CreateSlot, Slot, SlotListQuery, UpdateSlot};
use parkfleet_db::repositories::SlotRepo;

use crate::error::AppResult;
use crate::middleware::{AuthUser, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/slots (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateSlot>,
) -> AppResult<(StatusCode, Json<DataResponse<Slot>>)> {
    let slot = SlotRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: slot })))
}

/// GET /api/v1/slots
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SlotListQuery>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    let slots = SlotRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// GET /api/v1/slots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Slot>>> {
    let slot = SlotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Slot", id })?;
    Ok(Json(DataResponse { data: slot }))
}

/// PUT /api/v1/slots/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSlot>,
) -> AppResult<Json<DataResponse<Slot>>> {
    let slot = SlotRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: slot }))
}

/// DELETE /api/v1/slots/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    SlotRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
