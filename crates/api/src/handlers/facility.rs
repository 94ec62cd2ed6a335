//! Handlers for the `/facilities` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkfleet_core::error::CoreError;
use parkfleet_core::types::DbId;
use parkfleet_db::models::facility::{CreateFacility, Facility, UpdateFacility};
use parkfleet_db::repositories::FacilityRepo;

use crate::error::AppResult;
use crate::middleware::{AuthUser, RequireAdmin};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/facilities (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateFacility>,
) -> AppResult<(StatusCode, Json<DataResponse<Facility>>)> {
    let facility = FacilityRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: facility })))
}

/// GET /api/v1/facilities
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Facility>>>> {
    let facilities = FacilityRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: facilities }))
}

/// GET /api/v1/facilities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Facility>>> {
    let facility = FacilityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Facility",
            id,
        })?;
    Ok(Json(DataResponse { data: facility }))
}

/// PUT /api/v1/facilities/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFacility>,
) -> AppResult<Json<DataResponse<Facility>>> {
    let facility = FacilityRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: facility }))
}

/// DELETE /api/v1/facilities/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    FacilityRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
