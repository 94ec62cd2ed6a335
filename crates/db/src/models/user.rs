//! User account model.
//!
//! Account management is out of scope for this service; this is the thin
//! record the core reads for the balance check and notification contact.

use parkfleet_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub balance: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a user (seed tooling and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub balance: Option<Decimal>,
}
