//! Guest repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use super::DbError;

/// Guest record from database
#[derive(Debug, Clone, FromRow)]
pub struct Guest {
    pub id: i64,
    pub guest_token: String,
    pub created_at: DateTime<Utc>,
}

/// Guest repository
pub struct GuestRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> GuestRepo<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Return the guest for `token`, creating it on first use.
    ///
    /// Concurrent first uses race on the UNIQUE token; the loser's insert is
    /// a no-op and both read the same row.
    pub async fn get_or_create(
        &mut self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Guest, DbError> {
        sqlx::query(
            "INSERT INTO guests (guest_token, created_at) VALUES (?, ?) ON CONFLICT(guest_token) DO NOTHING",
        )
        .bind(token)
        .bind(now)
        .execute(&mut *self.conn)
        .await?;

        self.find_by_token(token)
            .await?
            .ok_or_else(|| DbError::not_found("guest", token))
    }

    pub async fn find_by_token(&mut self, token: &str) -> Result<Option<Guest>, DbError> {
        let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE guest_token = ?")
            .bind(token)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(guest)
    }
}
