//! Identity extractor for Axum handlers.
//!
//! This service runs behind a gateway that authenticates callers and
//! forwards the verified identity in the `x-user-id` and `x-user-role`
//! headers. The extractor trusts those headers; requests arriving without
//! them are rejected with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parkfleet_core::error::CoreError;
use parkfleet_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from the gateway identity headers.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's internal database id (from `x-user-id`).
    pub user_id: DbId,
    /// The caller's role name (e.g. `"admin"`, `"attendant"`, `"customer"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id: DbId = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing or invalid x-user-id header".into(),
                ))
            })?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing x-user-role header".into(),
                ))
            })?;

        Ok(AuthUser { user_id, role })
    }
}
