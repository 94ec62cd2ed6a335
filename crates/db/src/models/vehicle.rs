//! Vehicle record model.
//!
//! Vehicle CRUD is out of scope; the lifecycle engine reads these rows for
//! ownership and slot-compatibility checks.

use parkfleet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub user_id: DbId,
    pub plate_number: String,
    pub size: String,
    pub vehicle_type: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a vehicle (seed tooling and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicle {
    pub user_id: DbId,
    pub plate_number: String,
    pub size: String,
    pub vehicle_type: String,
}
