//! Repository for the `facilities` table: the facility registry and its
//! occupancy accounting.
//!
//! Occupancy is a row-level counter mutated only through guarded updates
//! inside transactions, never through an in-memory counter; concurrent
//! entries/exits against the same facility serialize on the row lock.

use parkfleet_core::error::CoreError;
use parkfleet_core::facility_code::parse_facility_code;
use parkfleet_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::error::{unique_constraint, RepoError};
use crate::models::facility::{CreateFacility, Facility, UpdateFacility};
use crate::tx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, code, name, total_spaces, occupied_spaces, hourly_rate, location, created_at, updated_at";

/// Provides registry and occupancy operations for facilities.
pub struct FacilityRepo;

impl FacilityRepo {
    /// Insert a new facility with zero occupancy, returning the created row.
    ///
    /// The code is normalized to upper-case before insert, so uniqueness is
    /// case-insensitive. A duplicate code surfaces as `Conflict`.
    pub async fn create(pool: &PgPool, input: &CreateFacility) -> Result<Facility, RepoError> {
        let code = parse_facility_code(&input.code)?;
        if input.name.trim().is_empty() {
            return Err(CoreError::InvalidArgument("Facility name must not be empty".into()).into());
        }
        if input.total_spaces <= 0 {
            return Err(
                CoreError::InvalidArgument("total_spaces must be greater than zero".into()).into(),
            );
        }
        if input.hourly_rate < Decimal::ZERO {
            return Err(
                CoreError::InvalidArgument("hourly_rate must not be negative".into()).into(),
            );
        }

        let query = format!(
            "INSERT INTO facilities (code, name, total_spaces, hourly_rate, location)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Facility>(&query)
            .bind(&code)
            .bind(input.name.trim())
            .bind(input.total_spaces)
            .bind(input.hourly_rate)
            .bind(&input.location)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err) {
                Some("uq_facilities_code") => {
                    CoreError::Conflict(format!("Facility code {code} is already registered"))
                        .into()
                }
                _ => RepoError::from(err),
            })
    }

    /// Find a facility by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Facility>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM facilities WHERE id = $1");
        sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List facilities ordered by code.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Facility>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM facilities ORDER BY code LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Facility>(&query)
            .bind(crate::clamp_limit(limit))
            .bind(crate::clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Patch a facility. Only non-`None` fields in `input` are applied.
    ///
    /// Runs in a transaction with the row locked: lowering `total_spaces`
    /// below the current occupancy, or setting `occupied_spaces` above the
    /// effective total, fails with `CapacityExceeded`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFacility,
    ) -> Result<Facility, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            Self::update_tx(&pool, id, input).await
        })
        .await
    }

    async fn update_tx(pool: &PgPool, id: DbId, input: &UpdateFacility) -> Result<Facility, RepoError> {
        let mut tx = pool.begin().await?;

        let current = Self::lock_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Facility",
                id,
            })?;

        let new_total = input.total_spaces.unwrap_or(current.total_spaces);
        let new_occupied = input.occupied_spaces.unwrap_or(current.occupied_spaces);

        if new_total <= 0 {
            return Err(
                CoreError::InvalidArgument("total_spaces must be greater than zero".into()).into(),
            );
        }
        if new_occupied < 0 {
            return Err(
                CoreError::InvalidArgument("occupied_spaces must not be negative".into()).into(),
            );
        }
        if let Some(rate) = input.hourly_rate {
            if rate < Decimal::ZERO {
                return Err(
                    CoreError::InvalidArgument("hourly_rate must not be negative".into()).into(),
                );
            }
        }
        if new_occupied > new_total {
            return Err(CoreError::CapacityExceeded(format!(
                "occupied_spaces {new_occupied} would exceed total_spaces {new_total} \
                 for facility {}",
                current.code
            ))
            .into());
        }

        let query = format!(
            "UPDATE facilities SET
                name = COALESCE($2, name),
                total_spaces = $3,
                occupied_spaces = $4,
                hourly_rate = COALESCE($5, hourly_rate),
                location = COALESCE($6, location),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(new_total)
            .bind(new_occupied)
            .bind(input.hourly_rate)
            .bind(&input.location)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a facility.
    ///
    /// Fails with `Conflict` while any vehicle entry at the facility has
    /// status PARKED; closed session history is removed with the facility.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        tx::with_tx_retry(pool, |pool| async move { Self::delete_tx(&pool, id).await }).await
    }

    async fn delete_tx(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;

        let facility = Self::lock_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Facility",
                id,
            })?;

        let parked: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM vehicle_entries WHERE facility_id = $1 AND status = 'PARKED' LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if parked.is_some() {
            return Err(CoreError::Conflict(format!(
                "Facility {} still has parked vehicles",
                facility.code
            ))
            .into());
        }

        sqlx::query("DELETE FROM facilities WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Atomically increment occupancy, failing with `CapacityExceeded` when
    /// the facility is full.
    pub async fn increment_occupancy(pool: &PgPool, id: DbId) -> Result<Facility, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            let mut tx = pool.begin().await?;
            let facility = Self::increment_occupancy_in(&mut tx, id).await?;
            tx.commit().await?;
            Ok(facility)
        })
        .await
    }

    /// Atomically decrement occupancy, clamping at zero.
    pub async fn decrement_occupancy(pool: &PgPool, id: DbId) -> Result<Facility, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            let mut tx = pool.begin().await?;
            let facility = Self::decrement_occupancy_in(&mut tx, id).await?;
            tx.commit().await?;
            Ok(facility)
        })
        .await
    }

    /// Lock and return a facility row (`SELECT ... FOR UPDATE`).
    pub(crate) async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Facility>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM facilities WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Guarded occupancy increment inside an open transaction.
    ///
    /// The `occupied_spaces < total_spaces` predicate is part of the UPDATE
    /// itself; when it matches no row, the follow-up locked read tells a
    /// full facility apart from a missing one.
    pub(crate) async fn increment_occupancy_in(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Facility, RepoError> {
        let query = format!(
            "UPDATE facilities
             SET occupied_spaces = occupied_spaces + 1, updated_at = NOW()
             WHERE id = $1 AND occupied_spaces < total_spaces
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match updated {
            Some(facility) => Ok(facility),
            None => match Self::lock_by_id(conn, id).await? {
                Some(facility) => Err(CoreError::CapacityExceeded(format!(
                    "Facility {} is full ({}/{})",
                    facility.code, facility.occupied_spaces, facility.total_spaces
                ))
                .into()),
                None => Err(CoreError::NotFound {
                    entity: "Facility",
                    id,
                }
                .into()),
            },
        }
    }

    /// Occupancy decrement inside an open transaction, floored at zero.
    ///
    /// A decrement at zero means a prior inconsistency (an exit without a
    /// matching entry); it is clamped and logged as a data-integrity
    /// warning rather than surfaced as an error, since the current
    /// operation itself is sound.
    pub(crate) async fn decrement_occupancy_in(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Facility, RepoError> {
        let facility = Self::lock_by_id(&mut *conn, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Facility",
                id,
            })?;

        if facility.occupied_spaces == 0 {
            tracing::warn!(
                facility_id = id,
                code = %facility.code,
                "Occupancy decrement at zero clamped; counter was already inconsistent"
            );
            return Ok(facility);
        }

        let query = format!(
            "UPDATE facilities
             SET occupied_spaces = occupied_spaces - 1, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .fetch_one(conn)
            .await?;
        Ok(updated)
    }
}
