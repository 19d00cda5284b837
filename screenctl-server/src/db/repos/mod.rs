//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows a connection, so callers choose pool or transaction
//! - Relies on UNIQUE constraints and maps violations to `Conflict`
//! - Returns rows with `RETURNING *` instead of a second read

pub mod applications;
pub mod guests;
pub mod screens;
pub mod users;

pub use applications::{Application, ApplicationRepo};
pub use guests::{Guest, GuestRepo};
pub use screens::{Screen, ScreenRepo};
pub use users::{NewUser, User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{name}' already exists")]
    Conflict { resource: &'static str, name: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Whether the error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Whether the error is a FOREIGN KEY constraint violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}
