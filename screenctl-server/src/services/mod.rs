//! Business rules between HTTP handlers and repositories
//!
//! Services take the caller's `Owner` explicitly, check ownership, and run
//! multi-step writes (screen change plus parent touch) in one transaction.

pub mod accounts;
pub mod applications;
pub mod guests;
pub mod screens;

pub use accounts::AccountService;
pub use applications::ApplicationService;
pub use guests::GuestService;
pub use screens::ScreenService;

use crate::db::{Application, DbError};
use crate::models::{Owner, ValidationError};

/// Service-level error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} '{name}' already exists")]
    Conflict { resource: &'static str, name: String },

    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("invalid username or password")]
    Authentication,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(e) => Self::Database(e),
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { resource, name } => Self::Conflict { resource, name },
        }
    }
}

/// Fail with `Forbidden` unless `owner` owns `app`.
pub(crate) fn ensure_owner(app: &Application, owner: Owner, action: &str) -> ServiceResult<()> {
    if app.is_owned_by(owner) {
        return Ok(());
    }

    tracing::warn!(application_id = app.id, caller = %owner, action, "ownership check failed");
    Err(ServiceError::Forbidden {
        reason: format!("you can only {} your own applications", action),
    })
}

/// Treat blank optional strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
