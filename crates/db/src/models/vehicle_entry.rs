//! Vehicle entry (parking session) entity model and DTOs.

use parkfleet_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Session state, stored as TEXT. `PARKED -> EXITED` is the only
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Parked,
    Exited,
}

impl EntryStatus {
    /// Database representation, for query parameters that need a text cast.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Parked => "PARKED",
            EntryStatus::Exited => "EXITED",
        }
    }
}

/// A row from the `vehicle_entries` table: one physical parking session.
///
/// `charged_amount` stays zero while PARKED and is finalized at exit.
/// `recorded_by` is the attendant who performed the most recent transition.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VehicleEntry {
    pub id: DbId,
    pub plate_number: String,
    pub facility_id: DbId,
    pub entry_time: Timestamp,
    pub exit_time: Option<Timestamp>,
    pub status: EntryStatus,
    pub ticket_number: String,
    pub charged_amount: Decimal,
    pub calculated_duration_minutes: Option<i32>,
    pub recorded_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/entries`. The recording attendant comes from the
/// authenticated identity.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEntry {
    pub plate_number: String,
    pub facility_id: DbId,
}

/// Query parameters for `GET /api/v1/entries`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryListQuery {
    pub status: Option<EntryStatus>,
    pub facility_id: Option<DbId>,
    pub plate_number: Option<String>,
    /// Inclusive lower bound on `entry_time`.
    pub from: Option<Timestamp>,
    /// Exclusive upper bound on `entry_time`.
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
