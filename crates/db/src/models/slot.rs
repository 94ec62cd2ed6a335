//! Slot entity model and DTOs.

use parkfleet_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Slot availability, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Available,
    Unavailable,
}

impl SlotStatus {
    /// Database representation, for query parameters that need a text cast.
    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Available => "AVAILABLE",
            SlotStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

/// A row from the `slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slot {
    pub id: DbId,
    pub slot_number: String,
    pub size: String,
    pub vehicle_type: String,
    pub location: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub status: SlotStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new slot. New slots start AVAILABLE.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlot {
    pub slot_number: String,
    pub size: String,
    pub vehicle_type: String,
    pub location: Option<String>,
    pub hourly_rate: Option<Decimal>,
}

/// DTO for patching a slot. Only non-`None` fields are applied.
///
/// Setting `status` to AVAILABLE is rejected while an APPROVED request
/// references the slot.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSlot {
    pub size: Option<String>,
    pub vehicle_type: Option<String>,
    pub location: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub status: Option<SlotStatus>,
}

/// Query parameters for `GET /api/v1/slots`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotListQuery {
    pub status: Option<SlotStatus>,
    pub vehicle_type: Option<String>,
    pub size: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
