//! Facility entity model and DTOs.

use parkfleet_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `facilities` table.
///
/// Invariant: `0 <= occupied_spaces <= total_spaces`, enforced both by the
/// `ck_facilities_occupancy` check constraint and by every transactional
/// mutation path.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Facility {
    pub id: DbId,
    /// Unique, normalized upper-case, 1-10 alphanumeric/-/_ characters.
    pub code: String,
    pub name: String,
    pub total_spaces: i32,
    pub occupied_spaces: i32,
    pub hourly_rate: Option<Decimal>,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Facility {
    /// Whether every space is occupied.
    pub fn is_full(&self) -> bool {
        self.occupied_spaces >= self.total_spaces
    }
}

/// DTO for creating a new facility. Occupancy always starts at zero.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacility {
    pub code: String,
    pub name: String,
    pub total_spaces: i32,
    pub hourly_rate: Decimal,
    pub location: Option<String>,
}

/// DTO for patching a facility. Only non-`None` fields are applied.
///
/// `occupied_spaces` is an explicit admin override; it is still validated
/// against the effective `total_spaces`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFacility {
    pub name: Option<String>,
    pub total_spaces: Option<i32>,
    pub occupied_spaces: Option<i32>,
    pub hourly_rate: Option<Decimal>,
    pub location: Option<String>,
}
