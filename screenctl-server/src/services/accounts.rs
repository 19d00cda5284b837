//! Account registration and login

use chrono::Utc;
use sqlx::SqlitePool;

use super::{ServiceError, ServiceResult};
use crate::auth::{hash_password, verify_password};
use crate::db::{DbError, NewUser, User, UserRepo};
use crate::models::{Registration, ValidationError};

pub struct AccountService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate the form, check uniqueness, hash the password and create the
    /// user. Every failure the form can fix is a `ValidationError`.
    pub async fn register(&self, form: Registration) -> ServiceResult<User> {
        let valid = form.validate()?;

        {
            let mut conn = self.pool.acquire().await?;
            let mut users = UserRepo::new(&mut conn);

            if users.username_taken(&valid.username).await? {
                return Err(ValidationError::Taken { field: "username" }.into());
            }
            if let Some(email) = valid.email.as_deref() {
                if users.email_taken(email).await? {
                    return Err(ValidationError::Taken { field: "email" }.into());
                }
            }
        }

        let password = valid.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut conn = self.pool.acquire().await?;
        let new_user = NewUser {
            username: &valid.username,
            email: valid.email.as_deref(),
            contact_number: valid.contact_number.as_deref(),
            password_hash: &password_hash,
        };

        // A concurrent registration can still win the race to the constraint
        let user = UserRepo::new(&mut conn)
            .insert(new_user, Utc::now())
            .await
            .map_err(|e| match e {
                DbError::Conflict { resource, .. } => {
                    ServiceError::Validation(ValidationError::Taken { field: resource })
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Case-insensitive username lookup plus password check. Unknown user and
    /// wrong password produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let user = {
            let mut conn = self.pool.acquire().await?;
            UserRepo::new(&mut conn).find_by_username(username.trim()).await?
        };

        let Some(user) = user else {
            tracing::warn!(username, "login failed: unknown user");
            return Err(ServiceError::Authentication);
        };

        let password = password.to_owned();
        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        match verified {
            Ok(true) => {
                tracing::info!(user_id = user.id, "user signed in");
                Ok(user)
            }
            Ok(false) => {
                tracing::warn!(user_id = user.id, "login failed: wrong password");
                Err(ServiceError::Authentication)
            }
            Err(e) => {
                tracing::error!(
                    user_id = user.id,
                    error = %e,
                    "login failed: unreadable password hash"
                );
                Err(ServiceError::Authentication)
            }
        }
    }

    pub async fn find_user(&self, id: i64) -> ServiceResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        Ok(UserRepo::new(&mut conn).find(id).await?)
    }
}
