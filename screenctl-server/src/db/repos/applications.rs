//! Application repository
//!
//! Owner columns are bound with `IS ?` so a NULL side matches NULL.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use super::{is_unique_violation, DbError};
use crate::models::{ApplicationName, Owner};

/// Application record from database
#[derive(Debug, Clone, FromRow)]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub icon_path: Option<String>,
    pub user_id: Option<i64>,
    pub guest_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn owner(&self) -> Option<Owner> {
        Owner::from_columns(self.user_id, self.guest_id)
    }

    pub fn is_owned_by(&self, owner: Owner) -> bool {
        self.owner() == Some(owner)
    }
}

/// Application repository
pub struct ApplicationRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ApplicationRepo<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert with `created_at = updated_at = now`.
    pub async fn insert(
        &mut self,
        owner: Owner,
        name: &ApplicationName,
        icon_path: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Application, DbError> {
        let (user_id, guest_id) = owner.columns();

        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (name, icon_path, user_id, guest_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name.as_str())
        .bind(icon_path)
        .bind(user_id)
        .bind(guest_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| conflict_or_sqlx(e, name))
    }

    pub async fn find(&mut self, id: i64) -> Result<Option<Application>, DbError> {
        let app = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(app)
    }

    pub async fn get(&mut self, id: i64) -> Result<Application, DbError> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("application", id))
    }

    /// Applications of one owner, newest first.
    pub async fn list_for_owner(&mut self, owner: Owner) -> Result<Vec<Application>, DbError> {
        let (user_id, guest_id) = owner.columns();

        let apps = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE user_id IS ? AND guest_id IS ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(guest_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(apps)
    }

    /// Rename and bump `updated_at`. `icon_path = None` keeps the current icon.
    pub async fn update(
        &mut self,
        id: i64,
        name: &ApplicationName,
        icon_path: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Application, DbError> {
        sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET name = ?, icon_path = COALESCE(?, icon_path), updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name.as_str())
        .bind(icon_path)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| conflict_or_sqlx(e, name))?
        .ok_or_else(|| DbError::not_found("application", id))
    }

    /// Bump `updated_at` to `now`.
    pub async fn touch(&mut self, id: i64, now: DateTime<Utc>) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE applications SET updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("application", id));
        }
        Ok(())
    }

    /// Delete the row; screens follow through the foreign-key cascade.
    pub async fn delete(&mut self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("application", id));
        }
        Ok(())
    }
}

fn conflict_or_sqlx(err: sqlx::Error, name: &ApplicationName) -> DbError {
    if is_unique_violation(&err) {
        DbError::Conflict {
            resource: "application",
            name: name.as_str().to_owned(),
        }
    } else {
        DbError::Sqlx(err)
    }
}
