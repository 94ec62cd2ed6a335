//! Repository for the `vehicle_entries` table: the entry/exit ledger.
//!
//! Entry creation and occupancy increment commit together or not at all,
//! as do exit finalization and occupancy decrement. Concurrent entries at
//! the same facility serialize on the facility row lock, so a facility at
//! capacity-minus-one admits exactly one of two racing vehicles.

use chrono::Utc;
use parkfleet_core::billing;
use parkfleet_core::error::CoreError;
use parkfleet_core::plates::parse_plate;
use parkfleet_core::tickets::generate_ticket_number;
use parkfleet_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::{unique_constraint, RepoError};
use crate::models::vehicle_entry::{EntryListQuery, EntryStatus, RecordEntry, VehicleEntry};
use crate::repositories::FacilityRepo;
use crate::tx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, plate_number, facility_id, entry_time, exit_time, status, \
    ticket_number, charged_amount, calculated_duration_minutes, recorded_by, \
    created_at, updated_at";

/// Provides ledger operations for parking sessions.
pub struct VehicleEntryRepo;

impl VehicleEntryRepo {
    /// Record a vehicle entering a facility.
    ///
    /// Creates a PARKED session with a fresh ticket number and increments
    /// the facility's occupancy in one transaction. Fails with
    /// `CapacityExceeded` when the facility is full and `Conflict` when the
    /// plate already has a PARKED session.
    pub async fn record_entry(
        pool: &PgPool,
        input: &RecordEntry,
        recorded_by: DbId,
    ) -> Result<VehicleEntry, RepoError> {
        let plate = parse_plate(&input.plate_number)?;
        let plate = plate.as_str();
        tx::with_tx_retry(pool, |pool| async move {
            Self::record_entry_tx(&pool, plate, input.facility_id, recorded_by).await
        })
        .await
    }

    async fn record_entry_tx(
        pool: &PgPool,
        plate: &str,
        facility_id: DbId,
        recorded_by: DbId,
    ) -> Result<VehicleEntry, RepoError> {
        let mut tx = pool.begin().await?;

        let facility = FacilityRepo::lock_by_id(&mut tx, facility_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Facility",
                id: facility_id,
            })?;

        if facility.is_full() {
            return Err(CoreError::CapacityExceeded(format!(
                "Facility {} is full ({}/{})",
                facility.code, facility.occupied_spaces, facility.total_spaces
            ))
            .into());
        }

        let parked: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM vehicle_entries WHERE plate_number = $1 AND status = 'PARKED' LIMIT 1",
        )
        .bind(plate)
        .fetch_optional(&mut *tx)
        .await?;
        if parked.is_some() {
            return Err(
                CoreError::Conflict(format!("Plate {plate} is already parked")).into(),
            );
        }

        let entry = Self::insert_parked(&mut tx, plate, facility_id, recorded_by).await?;
        FacilityRepo::increment_occupancy_in(&mut tx, facility_id).await?;

        tx.commit().await?;
        Ok(entry)
    }

    /// Insert the PARKED row, retrying once with a fresh ticket number if
    /// the generated one collides.
    async fn insert_parked(
        conn: &mut PgConnection,
        plate: &str,
        facility_id: DbId,
        recorded_by: DbId,
    ) -> Result<VehicleEntry, RepoError> {
        let query = format!(
            "INSERT INTO vehicle_entries (plate_number, facility_id, ticket_number, recorded_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );

        let mut attempts = 0;
        loop {
            let ticket = generate_ticket_number(Utc::now());
            let result = sqlx::query_as::<_, VehicleEntry>(&query)
                .bind(plate)
                .bind(facility_id)
                .bind(&ticket)
                .bind(recorded_by)
                .fetch_one(&mut *conn)
                .await;

            match result {
                Ok(entry) => return Ok(entry),
                Err(err) => match unique_constraint(&err) {
                    Some("uq_vehicle_entries_ticket") if attempts == 0 => {
                        attempts += 1;
                        tracing::warn!(ticket = %ticket, "Ticket number collision; regenerating");
                    }
                    Some("uq_vehicle_entries_parked_plate") => {
                        return Err(CoreError::Conflict(format!(
                            "Plate {plate} is already parked"
                        ))
                        .into());
                    }
                    _ => return Err(err.into()),
                },
            }
        }
    }

    /// Record a vehicle exiting: finalize the bill and free the space.
    ///
    /// Computes the billed duration and charge from the facility's hourly
    /// rate, marks the session EXITED, and decrements occupancy (floored at
    /// zero) in one transaction.
    pub async fn record_exit(
        pool: &PgPool,
        entry_id: DbId,
        recorded_by: DbId,
    ) -> Result<VehicleEntry, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            Self::record_exit_tx(&pool, entry_id, recorded_by).await
        })
        .await
    }

    async fn record_exit_tx(
        pool: &PgPool,
        entry_id: DbId,
        recorded_by: DbId,
    ) -> Result<VehicleEntry, RepoError> {
        let mut tx = pool.begin().await?;

        let entry = Self::lock_by_id(&mut tx, entry_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "VehicleEntry",
                id: entry_id,
            })?;

        if entry.status != EntryStatus::Parked {
            return Err(CoreError::StateConflict(format!(
                "Entry {} is not parked (ticket {})",
                entry.id, entry.ticket_number
            ))
            .into());
        }

        let facility = FacilityRepo::lock_by_id(&mut tx, entry.facility_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Facility",
                id: entry.facility_id,
            })?;

        let rate = facility.hourly_rate.ok_or_else(|| {
            CoreError::StateConflict(format!(
                "Facility {} has no hourly rate; cannot bill exit",
                facility.code
            ))
        })?;

        let exit_time = Utc::now();
        let minutes = billing::duration_minutes(entry.entry_time, exit_time);
        let hours = billing::billed_hours(minutes);
        let charge = billing::parking_charge(rate, hours);

        let query = format!(
            "UPDATE vehicle_entries
             SET exit_time = $2, status = 'EXITED', calculated_duration_minutes = $3,
                 charged_amount = $4, recorded_by = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let exited = sqlx::query_as::<_, VehicleEntry>(&query)
            .bind(entry_id)
            .bind(exit_time)
            .bind(i32::try_from(minutes).unwrap_or(i32::MAX))
            .bind(charge)
            .bind(recorded_by)
            .fetch_one(&mut *tx)
            .await?;

        FacilityRepo::decrement_occupancy_in(&mut tx, entry.facility_id).await?;

        tx.commit().await?;
        Ok(exited)
    }

    /// Find an entry by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VehicleEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicle_entries WHERE id = $1");
        sqlx::query_as::<_, VehicleEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries with optional filters, newest first.
    pub async fn list(
        pool: &PgPool,
        query_params: &EntryListQuery,
    ) -> Result<Vec<VehicleEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicle_entries
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::bigint IS NULL OR facility_id = $2)
               AND ($3::text IS NULL OR plate_number = $3)
               AND ($4::timestamptz IS NULL OR entry_time >= $4)
               AND ($5::timestamptz IS NULL OR entry_time < $5)
             ORDER BY entry_time DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, VehicleEntry>(&query)
            .bind(query_params.status.map(EntryStatus::as_str))
            .bind(query_params.facility_id)
            .bind(
                query_params
                    .plate_number
                    .as_deref()
                    .map(parkfleet_core::plates::normalize_plate),
            )
            .bind(query_params.from)
            .bind(query_params.to)
            .bind(crate::clamp_limit(query_params.limit))
            .bind(crate::clamp_offset(query_params.offset))
            .fetch_all(pool)
            .await
    }

    /// Lock and return an entry row (`SELECT ... FOR UPDATE`).
    async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<VehicleEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicle_entries WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, VehicleEntry>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
