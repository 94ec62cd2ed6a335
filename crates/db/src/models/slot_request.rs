//! Slot request entity model and DTOs.

use parkfleet_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle state of a slot request, stored as TEXT.
///
/// PENDING and APPROVED are active states (a user may hold at most one
/// request in either); REJECTED and CANCELLED are terminal. An APPROVED
/// request can still be unwound by an admin rejection, which releases the
/// reserved slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotRequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl SlotRequestStatus {
    /// Database representation, for query parameters that need a text cast.
    pub fn as_str(self) -> &'static str {
        match self {
            SlotRequestStatus::Pending => "PENDING",
            SlotRequestStatus::Approved => "APPROVED",
            SlotRequestStatus::Rejected => "REJECTED",
            SlotRequestStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Whether the request counts against the one-active-request-per-user
    /// rule (matches the `uq_slot_requests_active_user` predicate).
    pub fn is_active(self) -> bool {
        matches!(self, SlotRequestStatus::Pending | SlotRequestStatus::Approved)
    }
}

/// A row from the `slot_requests` table.
///
/// `calculated_cost` is computed once at creation from the then-current
/// slot rate and never recomputed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlotRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub vehicle_id: DbId,
    pub slot_id: Option<DbId>,
    pub expected_duration_hours: i32,
    pub calculated_cost: Decimal,
    pub status: SlotRequestStatus,
    pub requested_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub admin_notes: Option<String>,
}

/// DTO for `POST /api/v1/slot-requests`. The requesting user comes from
/// the authenticated identity, not the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlotRequest {
    pub vehicle_id: DbId,
    pub slot_id: DbId,
    pub expected_duration_hours: i32,
}

/// DTO for `POST /api/v1/slot-requests/{id}/approve`.
///
/// The admin chooses the final slot; it may differ from the slot named at
/// creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveSlotRequest {
    pub slot_id: DbId,
    pub admin_notes: Option<String>,
}

/// DTO for `POST /api/v1/slot-requests/{id}/reject`.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectSlotRequest {
    pub admin_notes: Option<String>,
}

/// Query parameters for `GET /api/v1/slot-requests`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotRequestListQuery {
    pub status: Option<SlotRequestStatus>,
    pub user_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
