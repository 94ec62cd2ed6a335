//! Repository error type.
//!
//! Plain CRUD methods return `sqlx::Error` directly; lifecycle operations
//! that also enforce domain rules return [`RepoError`], which carries either
//! a domain error or the underlying storage error. The API crate flattens
//! both arms into its HTTP error mapping.

use parkfleet_core::error::CoreError;

/// Error from a repository operation.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A domain rule was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The storage layer failed.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// If `err` is a PostgreSQL unique-constraint violation (SQLSTATE 23505),
/// return the violated constraint's name.
///
/// Repositories use this to translate known `uq_`-prefixed constraints into
/// domain conflicts instead of opaque 500s.
pub fn unique_constraint(err: &sqlx::Error) -> Option<&str> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return db_err.constraint();
        }
    }
    None
}
