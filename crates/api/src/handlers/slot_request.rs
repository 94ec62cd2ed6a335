//! Handlers for the `/slot-requests` resource.
//!
//! Customers create and cancel their own requests; admins resolve them.
//! Listing is scoped to the caller unless they are an admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkfleet_core::error::CoreError;
use parkfleet_core::roles::{role_has_permission, Permission};
use parkfleet_core::types::DbId;
use parkfleet_db::models::slot_request::{
    ApproveSlotRequest, CreateSlotRequest, RejectSlotRequest, SlotRequest, SlotRequestListQuery,
};
use parkfleet_db::repositories::{SlotRequestRepo, UserRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::notifications::TEMPLATE_SLOT_REQUEST_APPROVED;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/slot-requests
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSlotRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SlotRequest>>)> {
    if !role_has_permission(&user.role, Permission::RequestSlot) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Role may not request slots".into(),
        )));
    }
    let request = SlotRequestRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/slot-requests
///
/// Non-admin callers only ever see their own requests; any `user_id`
/// filter they pass is overridden.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(mut params): Query<SlotRequestListQuery>,
) -> AppResult<Json<DataResponse<Vec<SlotRequest>>>> {
    if !role_has_permission(&user.role, Permission::ResolveRequests) {
        params.user_id = Some(user.user_id);
    }
    let requests = SlotRequestRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/slot-requests/{id} (owner or admin)
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SlotRequest>>> {
    let request = SlotRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "SlotRequest",
            id,
        })?;
    if request.user_id != user.user_id
        && !role_has_permission(&user.role, Permission::ResolveRequests)
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not the owner of this slot request".into(),
        )));
    }
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/slot-requests/{id}/cancel (owner)
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SlotRequest>>> {
    let cancelled = SlotRequestRepo::cancel(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: cancelled }))
}

/// POST /api/v1/slot-requests/{id}/approve (admin)
///
/// The approval notification is dispatched only after the transaction has
/// committed; a delivery failure is logged, never surfaced to the caller.
pub async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveSlotRequest>,
) -> AppResult<Json<DataResponse<SlotRequest>>> {
    if !role_has_permission(&user.role, Permission::ResolveRequests) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Role may not resolve slot requests".into(),
        )));
    }
    let (approved, slot) = SlotRequestRepo::approve(&state.pool, id, &input).await?;

    match UserRepo::find_by_id(&state.pool, approved.user_id).await {
        Ok(Some(requester)) => {
            let payload = json!({
                "request_id": approved.id,
                "slot_number": slot.slot_number,
                "calculated_cost": approved.calculated_cost,
            });
            if let Err(err) = state
                .notifier
                .send(&requester.email, TEMPLATE_SLOT_REQUEST_APPROVED, payload)
                .await
            {
                tracing::warn!(
                    request_id = approved.id,
                    error = %err,
                    "Approval notification delivery failed"
                );
            }
        }
        Ok(None) => {
            tracing::warn!(
                request_id = approved.id,
                user_id = approved.user_id,
                "Requester no longer exists; skipping approval notification"
            );
        }
        Err(err) => {
            tracing::warn!(
                request_id = approved.id,
                error = %err,
                "Failed to load requester for approval notification"
            );
        }
    }

    Ok(Json(DataResponse { data: approved }))
}

/// POST /api/v1/slot-requests/{id}/reject (admin)
pub async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RejectSlotRequest>,
) -> AppResult<Json<DataResponse<SlotRequest>>> {
    if !role_has_permission(&user.role, Permission::ResolveRequests) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Role may not resolve slot requests".into(),
        )));
    }
    let rejected = SlotRequestRepo::reject(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: rejected }))
}
