//! Repository for the `slot_requests` table: the slot-request lifecycle
//! engine.
//!
//! Every transition runs in a single transaction with the request row (and
//! any slot it touches) locked `FOR UPDATE`. The user's row is locked
//! during creation so concurrent creates for the same user serialize; the
//! `uq_slot_requests_active_user` and `uq_slot_requests_active_slot`
//! partial indexes remain the final authority on the one-active-request
//! rule and on per-slot exclusivity.

use parkfleet_core::billing::reservation_cost;
use parkfleet_core::error::CoreError;
use parkfleet_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::{unique_constraint, RepoError};
use crate::models::slot::{Slot, SlotStatus};
use crate::models::slot_request::{
    ApproveSlotRequest, CreateSlotRequest, RejectSlotRequest, SlotRequest, SlotRequestListQuery,
    SlotRequestStatus,
};
use crate::models::user::User;
use crate::models::vehicle::Vehicle;
use crate::repositories::SlotRepo;
use crate::tx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, vehicle_id, slot_id, expected_duration_hours, \
    calculated_cost, status, requested_at, resolved_at, admin_notes";

/// Provides lifecycle operations for slot requests.
pub struct SlotRequestRepo;

impl SlotRequestRepo {
    /// Create a PENDING request for `user_id`.
    ///
    /// Validates vehicle ownership, slot availability and rate, the
    /// one-active-request rule, and (advisory only, nothing is debited)
    /// that the user's balance covers the calculated cost. All reads and
    /// the insert share one transaction.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSlotRequest,
    ) -> Result<SlotRequest, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            Self::create_tx(&pool, user_id, input).await
        })
        .await
    }

    async fn create_tx(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSlotRequest,
    ) -> Result<SlotRequest, RepoError> {
        if input.expected_duration_hours <= 0 {
            return Err(CoreError::InvalidArgument(
                "expected_duration_hours must be greater than zero".into(),
            )
            .into());
        }

        let mut tx = pool.begin().await?;

        // Lock the user row first: concurrent creates for the same user
        // serialize here instead of racing to the insert.
        let user: User = sqlx::query_as(
            "SELECT id, full_name, email, role, balance, created_at, updated_at
             FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

        let vehicle: Vehicle = sqlx::query_as(
            "SELECT id, user_id, plate_number, size, vehicle_type, created_at
             FROM vehicles WHERE id = $1",
        )
        .bind(input.vehicle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Vehicle",
            id: input.vehicle_id,
        })?;

        if vehicle.user_id != user_id {
            return Err(CoreError::Forbidden(format!(
                "Vehicle {} does not belong to the requesting user",
                vehicle.plate_number
            ))
            .into());
        }

        let slot = SlotRepo::lock_by_id(&mut tx, input.slot_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Slot",
                id: input.slot_id,
            })?;

        if slot.status != SlotStatus::Available {
            return Err(CoreError::StateConflict(format!(
                "Slot {} is not available",
                slot.slot_number
            ))
            .into());
        }
        let rate = slot.hourly_rate.ok_or_else(|| {
            CoreError::StateConflict(format!("Slot {} has no hourly rate", slot.slot_number))
        })?;

        // A PENDING request does not reserve the slot, so availability alone
        // does not rule out another active request on it.
        let holder: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM slot_requests
             WHERE slot_id = $1 AND status IN ('PENDING', 'APPROVED')
             LIMIT 1",
        )
        .bind(input.slot_id)
        .fetch_optional(&mut *tx)
        .await?;
        if holder.is_some() {
            return Err(CoreError::Conflict(format!(
                "Slot {} already has an active request",
                slot.slot_number
            ))
            .into());
        }

        let active: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM slot_requests
             WHERE user_id = $1 AND status IN ('PENDING', 'APPROVED')
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some((existing_id,)) = active {
            return Err(CoreError::Conflict(format!(
                "User {user_id} already has an active slot request ({existing_id})"
            ))
            .into());
        }

        let cost = reservation_cost(rate, input.expected_duration_hours);
        if user.balance < cost {
            return Err(CoreError::InsufficientBalance {
                required: cost,
                available: user.balance,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO slot_requests
                (user_id, vehicle_id, slot_id, expected_duration_hours, calculated_cost)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, SlotRequest>(&query)
            .bind(user_id)
            .bind(input.vehicle_id)
            .bind(input.slot_id)
            .bind(input.expected_duration_hours)
            .bind(cost)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| match unique_constraint(&err) {
                Some("uq_slot_requests_active_user") => CoreError::Conflict(format!(
                    "User {user_id} already has an active slot request"
                ))
                .into(),
                Some("uq_slot_requests_active_slot") => CoreError::Conflict(format!(
                    "Slot {} already has an active request",
                    input.slot_id
                ))
                .into(),
                _ => RepoError::from(err),
            })?;

        tx.commit().await?;
        Ok(request)
    }

    /// User-initiated PENDING -> CANCELLED transition. Owner only.
    pub async fn cancel(pool: &PgPool, id: DbId, user_id: DbId) -> Result<SlotRequest, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            Self::cancel_tx(&pool, id, user_id).await
        })
        .await
    }

    async fn cancel_tx(pool: &PgPool, id: DbId, user_id: DbId) -> Result<SlotRequest, RepoError> {
        let mut tx = pool.begin().await?;

        let request = Self::lock_by_id(&mut tx, id).await?.ok_or(CoreError::NotFound {
            entity: "SlotRequest",
            id,
        })?;

        if request.user_id != user_id {
            return Err(
                CoreError::Forbidden("Only the requesting user may cancel".into()).into(),
            );
        }
        if request.status != SlotRequestStatus::Pending {
            return Err(CoreError::already_resolved(id).into());
        }

        let query = format!(
            "UPDATE slot_requests
             SET status = 'CANCELLED', resolved_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let cancelled = sqlx::query_as::<_, SlotRequest>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(cancelled)
    }

    /// Admin-initiated PENDING -> APPROVED transition.
    ///
    /// The admin-chosen slot may differ from the slot named at creation;
    /// it must be AVAILABLE (a PENDING request never holds a reservation)
    /// and must not be claimed by another active request. A
    /// size/vehicle-type mismatch against the vehicle is logged but does
    /// not block. On success the slot is reserved in the same transaction.
    /// Returns the updated request and the assigned slot so the caller can
    /// dispatch a notification after commit.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        input: &ApproveSlotRequest,
    ) -> Result<(SlotRequest, Slot), RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            Self::approve_tx(&pool, id, input).await
        })
        .await
    }

    async fn approve_tx(
        pool: &PgPool,
        id: DbId,
        input: &ApproveSlotRequest,
    ) -> Result<(SlotRequest, Slot), RepoError> {
        let mut tx = pool.begin().await?;

        let request = Self::lock_by_id(&mut tx, id).await?.ok_or(CoreError::NotFound {
            entity: "SlotRequest",
            id,
        })?;
        if request.status != SlotRequestStatus::Pending {
            return Err(CoreError::already_resolved(id).into());
        }

        let slot = SlotRepo::lock_by_id(&mut tx, input.slot_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Slot",
                id: input.slot_id,
            })?;

        if slot.status != SlotStatus::Available {
            return Err(CoreError::StateConflict(format!(
                "Slot {} is not available",
                slot.slot_number
            ))
            .into());
        }

        // Compatibility check is advisory: the admin has final assignment
        // authority, so a mismatch warns instead of blocking.
        let vehicle: Option<Vehicle> = sqlx::query_as(
            "SELECT id, user_id, plate_number, size, vehicle_type, created_at
             FROM vehicles WHERE id = $1",
        )
        .bind(request.vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(vehicle) = vehicle {
            if vehicle.size != slot.size || vehicle.vehicle_type != slot.vehicle_type {
                tracing::warn!(
                    request_id = id,
                    slot_id = slot.id,
                    vehicle_size = %vehicle.size,
                    slot_size = %slot.size,
                    vehicle_type = %vehicle.vehicle_type,
                    slot_type = %slot.vehicle_type,
                    "Assigned slot does not match vehicle size/type"
                );
            }
        }

        let query = format!(
            "UPDATE slot_requests
             SET status = 'APPROVED', slot_id = $2, resolved_at = NOW(), admin_notes = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let approved = sqlx::query_as::<_, SlotRequest>(&query)
            .bind(id)
            .bind(slot.id)
            .bind(&input.admin_notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| match unique_constraint(&err) {
                Some("uq_slot_requests_active_slot") => CoreError::Conflict(format!(
                    "Slot {} is claimed by another active request",
                    slot.slot_number
                ))
                .into(),
                _ => RepoError::from(err),
            })?;

        let reserved = SlotRepo::reserve(&mut tx, slot.id).await?;

        tx.commit().await?;
        Ok((approved, reserved))
    }

    /// Admin-initiated rejection: PENDING -> REJECTED, or the reversal path
    /// APPROVED -> REJECTED, which releases the reserved slot back to
    /// AVAILABLE. Clears the slot linkage either way.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        input: &RejectSlotRequest,
    ) -> Result<SlotRequest, RepoError> {
        tx::with_tx_retry(pool, |pool| async move {
            Self::reject_tx(&pool, id, input).await
        })
        .await
    }

    async fn reject_tx(
        pool: &PgPool,
        id: DbId,
        input: &RejectSlotRequest,
    ) -> Result<SlotRequest, RepoError> {
        let mut tx = pool.begin().await?;

        let request = Self::lock_by_id(&mut tx, id).await?.ok_or(CoreError::NotFound {
            entity: "SlotRequest",
            id,
        })?;
        if request.status.is_terminal() {
            return Err(CoreError::already_resolved(id).into());
        }

        if request.status == SlotRequestStatus::Approved {
            if let Some(slot_id) = request.slot_id {
                SlotRepo::release(&mut tx, slot_id).await?;
            }
        }

        let query = format!(
            "UPDATE slot_requests
             SET status = 'REJECTED', slot_id = NULL, resolved_at = NOW(), admin_notes = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let rejected = sqlx::query_as::<_, SlotRequest>(&query)
            .bind(id)
            .bind(&input.admin_notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(rejected)
    }

    /// Find a request by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SlotRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slot_requests WHERE id = $1");
        sqlx::query_as::<_, SlotRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests with optional status/user filters, newest first.
    pub async fn list(
        pool: &PgPool,
        query_params: &SlotRequestListQuery,
    ) -> Result<Vec<SlotRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slot_requests
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::bigint IS NULL OR user_id = $2)
             ORDER BY requested_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, SlotRequest>(&query)
            .bind(query_params.status.map(SlotRequestStatus::as_str))
            .bind(query_params.user_id)
            .bind(crate::clamp_limit(query_params.limit))
            .bind(crate::clamp_offset(query_params.offset))
            .fetch_all(pool)
            .await
    }

    /// Lock and return a request row (`SELECT ... FOR UPDATE`).
    async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<SlotRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slot_requests WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, SlotRequest>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
