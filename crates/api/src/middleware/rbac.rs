//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! carry the required capability. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parkfleet_core::error::CoreError;
use parkfleet_core::roles::{role_has_permission, Permission};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a role that manages the facility and slot registries
/// (currently only `admin`). Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !role_has_permission(&user.role, Permission::ManageFacilities)
            || !role_has_permission(&user.role, Permission::ManageSlots)
        {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires a role allowed to record vehicle entries and exits
/// (`attendant` or `admin`). Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn gate_duty(RequireAttendant(user): RequireAttendant) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAttendant(pub AuthUser);

impl FromRequestParts<AppState> for RequireAttendant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !role_has_permission(&user.role, Permission::RecordEntries) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Attendant or Admin role required".into(),
            )));
        }
        Ok(RequireAttendant(user))
    }
}
