//! Domain error taxonomy.
//!
//! Every operation in the facility, slot, request, and entry subsystems
//! returns one of these kinds. The API crate maps them onto HTTP statuses;
//! nothing in this crate knows about HTTP.

use rust_decimal::Decimal;

use crate::types::DbId;

/// Domain-level error returned by core computations and repository
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed input. The caller's fault; retrying the same call is
    /// pointless.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Duplicate code/plate/slot-number, a conflicting active request, or an
    /// entity still in use. The caller may retry with different input.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A capacity invariant would be violated: the facility is full, or a
    /// patch would push occupancy outside `0..=total_spaces`.
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// The entity is not in a state that permits this transition
    /// (already-resolved request, non-parked entry, unavailable slot,
    /// missing rate at exit). The caller must re-fetch before retrying.
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// The user's balance does not cover the calculated cost. A business
    /// rule, not a transient condition.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    /// A storage-level transaction conflict that survived the bounded retry
    /// loop. Safe for the caller to retry.
    #[error("Transient storage conflict: {0}")]
    Transient(String),

    /// Missing or unusable identity at the boundary.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the `AlreadyResolved` state conflict shared by every
    /// lifecycle transition on a terminal request.
    pub fn already_resolved(id: DbId) -> Self {
        CoreError::StateConflict(format!("Slot request {id} is already resolved"))
    }
}
