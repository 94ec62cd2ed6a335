//! Bounded retry for transaction conflicts.
//!
//! Invariant-bearing operations lock the rows they touch with
//! `SELECT ... FOR UPDATE`; under concurrent load PostgreSQL can still
//! abort a transaction with a serialization failure or deadlock. Those are
//! safe to retry wholesale, a bounded number of times, after which the
//! conflict is surfaced as `CoreError::Transient`.

use std::future::Future;

use parkfleet_core::error::CoreError;
use sqlx::PgPool;

use crate::error::RepoError;

/// Maximum automatic retries for a conflicted transaction.
pub const MAX_TX_RETRIES: u32 = 3;

/// Whether `err` is a retryable transaction conflict: SQLSTATE 40001
/// (serialization failure) or 40P01 (deadlock detected).
pub fn is_transient_conflict(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        matches!(db_err.code().as_deref(), Some("40001") | Some("40P01"))
    } else {
        false
    }
}

/// Run `op` (a closure that opens and commits its own transaction),
/// retrying up to [`MAX_TX_RETRIES`] times on transient conflicts.
pub async fn with_tx_retry<T, F, Fut>(pool: &PgPool, op: F) -> Result<T, RepoError>
where
    F: Fn(PgPool) -> Fut,
    Fut: Future<Output = Result<T, RepoError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op(pool.clone()).await {
            Err(RepoError::Sqlx(err)) if is_transient_conflict(&err) => {
                attempt += 1;
                if attempt > MAX_TX_RETRIES {
                    return Err(CoreError::Transient(format!(
                        "Transaction conflict persisted after {MAX_TX_RETRIES} retries: {err}"
                    ))
                    .into());
                }
                tracing::warn!(attempt, error = %err, "Retrying conflicted transaction");
            }
            other => return other,
        }
    }
}
