//! Repository for the `users` table.
//!
//! Account management is out of scope; the core reads these rows for the
//! balance check and notification contact. `create` exists for seed
//! tooling and tests.

use parkfleet_core::error::CoreError;
use parkfleet_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{unique_constraint, RepoError};
use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, email, role, balance, created_at, updated_at";

/// Provides read access (and test/seed inserts) for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, RepoError> {
        let query = format!(
            "INSERT INTO users (full_name, email, role, balance)
             VALUES ($1, $2, $3, COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(input.balance)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err) {
                Some("uq_users_email") => {
                    CoreError::Conflict(format!("Email {} is already registered", input.email))
                        .into()
                }
                _ => RepoError::from(err),
            })
    }

    /// Find a user by their primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a user's balance (seed tooling and tests).
    pub async fn set_balance(
        pool: &PgPool,
        id: DbId,
        balance: Decimal,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET balance = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(balance)
            .fetch_optional(pool)
            .await
    }
}
