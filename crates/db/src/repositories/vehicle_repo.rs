//! Repository for the `vehicles` table.
//!
//! Vehicle CRUD is out of scope; the lifecycle engine reads these rows for
//! ownership and compatibility checks. `create` exists for seed tooling
//! and tests.

use parkfleet_core::error::CoreError;
use parkfleet_core::plates::parse_plate;
use parkfleet_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_constraint, RepoError};
use crate::models::vehicle::{CreateVehicle, Vehicle};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, plate_number, size, vehicle_type, created_at";

/// Provides read access (and test/seed inserts) for vehicles.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Insert a new vehicle with a normalized plate, returning the created
    /// row.
    pub async fn create(pool: &PgPool, input: &CreateVehicle) -> Result<Vehicle, RepoError> {
        let plate = parse_plate(&input.plate_number)?;
        let query = format!(
            "INSERT INTO vehicles (user_id, plate_number, size, vehicle_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(input.user_id)
            .bind(&plate)
            .bind(&input.size)
            .bind(&input.vehicle_type)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err) {
                Some("uq_vehicles_plate") => {
                    CoreError::Conflict(format!("Plate {plate} is already registered")).into()
                }
                _ => RepoError::from(err),
            })
    }

    /// Find a vehicle by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
