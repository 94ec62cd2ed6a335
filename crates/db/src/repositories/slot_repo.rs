//! Repository for the `slots` table: the slot registry.
//!
//! `reserve` and `release` are the lifecycle engine's transition entry
//! points; direct status edits go through `update`, which refuses to free a
//! slot that an APPROVED request still references.

use parkfleet_core::error::CoreError;
use parkfleet_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::error::{unique_constraint, RepoError};
use crate::models::slot::{CreateSlot, Slot, SlotListQuery, SlotStatus, UpdateSlot};
use crate::tx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, slot_number, size, vehicle_type, location, hourly_rate, status, created_at, updated_at";

/// Provides registry operations and lifecycle transitions for slots.
pub struct SlotRepo;

impl SlotRepo {
    /// Insert a new slot (status AVAILABLE), returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSlot) -> Result<Slot, RepoError> {
        if input.slot_number.trim().is_empty() {
            return Err(CoreError::InvalidArgument("slot_number must not be empty".into()).into());
        }
        if let Some(rate) = input.hourly_rate {
            if rate < Decimal::ZERO {
                return Err(
                    CoreError::InvalidArgument("hourly_rate must not be negative".into()).into(),
                );
            }
        }

        let query = format!(
            "INSERT INTO slots (slot_number, size, vehicle_type, location, hourly_rate)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(input.slot_number.trim())
            .bind(&input.size)
            .bind(&input.vehicle_type)
            .bind(&input.location)
            .bind(input.hourly_rate)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err) {
                Some("uq_slots_number") => CoreError::Conflict(format!(
                    "Slot number {} already exists",
                    input.slot_number.trim()
                ))
                .into(),
                _ => RepoError::from(err),
            })
    }

    /// Find a slot by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List slots with optional status/type/size filters, ordered by
    /// slot number.
    pub async fn list(pool: &PgPool, query_params: &SlotListQuery) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slots
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR vehicle_type = $2)
               AND ($3::text IS NULL OR size = $3)
             ORDER BY slot_number
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(query_params.status.map(SlotStatus::as_str))
            .bind(&query_params.vehicle_type)
            .bind(&query_params.size)
            .bind(crate::clamp_limit(query_params.limit))
            .bind(crate::clamp_offset(query_params.offset))
            .fetch_all(pool)
            .await
    }

    /// Patch a slot. Only non-`None` fields in `input` are applied.
    ///
    /// Setting the status to AVAILABLE is rejected with `Conflict` while an
    /// APPROVED request references the slot.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateSlot) -> Result<Slot, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            Self::update_tx(&pool, id, input).await
        })
        .await
    }

    async fn update_tx(pool: &PgPool, id: DbId, input: &UpdateSlot) -> Result<Slot, RepoError> {
        if let Some(rate) = input.hourly_rate {
            if rate < Decimal::ZERO {
                return Err(
                    CoreError::InvalidArgument("hourly_rate must not be negative".into()).into(),
                );
            }
        }

        let mut tx = pool.begin().await?;

        let current = Self::lock_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Slot", id })?;

        if input.status == Some(SlotStatus::Available)
            && current.status == SlotStatus::Unavailable
            && Self::has_approved_request(&mut tx, id).await?
        {
            return Err(CoreError::Conflict(format!(
                "Slot {} is reserved by an approved request",
                current.slot_number
            ))
            .into());
        }

        let query = format!(
            "UPDATE slots SET
                size = COALESCE($2, size),
                vehicle_type = COALESCE($3, vehicle_type),
                location = COALESCE($4, location),
                hourly_rate = COALESCE($5, hourly_rate),
                status = COALESCE($6, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .bind(&input.size)
            .bind(&input.vehicle_type)
            .bind(&input.location)
            .bind(input.hourly_rate)
            .bind(input.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a slot. Rejected with `Conflict` while an APPROVED request
    /// references it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        tx::with_tx_retry(pool, |pool| async move { Self::delete_tx(&pool, id).await }).await
    }

    async fn delete_tx(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;

        let slot = Self::lock_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Slot", id })?;

        if Self::has_approved_request(&mut tx, id).await? {
            return Err(CoreError::Conflict(format!(
                "Slot {} is reserved by an approved request",
                slot.slot_number
            ))
            .into());
        }

        sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Lifecycle transition: AVAILABLE -> UNAVAILABLE.
    ///
    /// The status predicate is part of the UPDATE; a slot that is missing
    /// or already reserved fails with `NotFound` / `StateConflict`.
    pub async fn reserve(conn: &mut PgConnection, id: DbId) -> Result<Slot, RepoError> {
        let query = format!(
            "UPDATE slots SET status = 'UNAVAILABLE', updated_at = NOW()
             WHERE id = $1 AND status = 'AVAILABLE'
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match updated {
            Some(slot) => Ok(slot),
            None => match Self::lock_by_id(conn, id).await? {
                Some(slot) => Err(CoreError::StateConflict(format!(
                    "Slot {} is not available",
                    slot.slot_number
                ))
                .into()),
                None => Err(CoreError::NotFound { entity: "Slot", id }.into()),
            },
        }
    }

    /// Lifecycle transition: set AVAILABLE unconditionally.
    pub async fn release(conn: &mut PgConnection, id: DbId) -> Result<Slot, RepoError> {
        let query = format!(
            "UPDATE slots SET status = 'AVAILABLE', updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Slot", id }.into())
    }

    /// Lock and return a slot row (`SELECT ... FOR UPDATE`).
    pub(crate) async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Whether any APPROVED slot request currently references this slot.
    async fn has_approved_request(
        conn: &mut PgConnection,
        slot_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM slot_requests WHERE slot_id = $1 AND status = 'APPROVED' LIMIT 1",
        )
        .bind(slot_id)
        .fetch_optional(conn)
        .await?;
        Ok(row.is_some())
    }
}
