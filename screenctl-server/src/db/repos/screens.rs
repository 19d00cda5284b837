//! Screen repository
//!
//! Callers touch the parent application in the same transaction; this repo
//! only writes the `screens` table.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use super::{is_foreign_key_violation, is_unique_violation, DbError};
use crate::models::ScreenName;

/// Screen record from database
#[derive(Debug, Clone, FromRow)]
pub struct Screen {
    pub id: i64,
    pub application_id: i64,
    pub name: String,
    pub layout_json: String,
    pub screen_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Screen repository
pub struct ScreenRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ScreenRepo<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &mut self,
        application_id: i64,
        name: &ScreenName,
        layout_json: &str,
        image_path: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Screen, DbError> {
        sqlx::query_as::<_, Screen>(
            r#"
            INSERT INTO screens (application_id, name, layout_json, screen_image_path, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(application_id)
        .bind(name.as_str())
        .bind(layout_json)
        .bind(image_path)
        .bind(now)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::not_found("application", application_id)
            } else {
                conflict_or_sqlx(e, name)
            }
        })
    }

    pub async fn find(&mut self, id: i64) -> Result<Option<Screen>, DbError> {
        let screen = sqlx::query_as::<_, Screen>("SELECT * FROM screens WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(screen)
    }

    pub async fn get(&mut self, id: i64) -> Result<Screen, DbError> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("screen", id))
    }

    /// Screens of one application, newest first.
    pub async fn list_for_application(
        &mut self,
        application_id: i64,
    ) -> Result<Vec<Screen>, DbError> {
        let screens = sqlx::query_as::<_, Screen>(
            r#"
            SELECT * FROM screens
            WHERE application_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(application_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(screens)
    }

    /// Replace name, layout and image path.
    pub async fn update(
        &mut self,
        id: i64,
        name: &ScreenName,
        layout_json: &str,
        image_path: Option<&str>,
    ) -> Result<Screen, DbError> {
        sqlx::query_as::<_, Screen>(
            r#"
            UPDATE screens
            SET name = ?, layout_json = ?, screen_image_path = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name.as_str())
        .bind(layout_json)
        .bind(image_path)
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| conflict_or_sqlx(e, name))?
        .ok_or_else(|| DbError::not_found("screen", id))
    }

    /// Replace only the layout.
    pub async fn update_layout(&mut self, id: i64, layout_json: &str) -> Result<Screen, DbError> {
        sqlx::query_as::<_, Screen>("UPDATE screens SET layout_json = ? WHERE id = ? RETURNING *")
            .bind(layout_json)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("screen", id))
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM screens WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("screen", id));
        }
        Ok(())
    }
}

fn conflict_or_sqlx(err: sqlx::Error, name: &ScreenName) -> DbError {
    if is_unique_violation(&err) {
        DbError::Conflict {
            resource: "screen",
            name: name.as_str().to_owned(),
        }
    } else {
        DbError::Sqlx(err)
    }
}
