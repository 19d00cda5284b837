//! Guest identity resolution

use chrono::Utc;
use sqlx::SqlitePool;

use super::ServiceResult;
use crate::db::{Guest, GuestRepo};

pub struct GuestService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GuestService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotently create the guest identified by `token`.
    pub async fn get_or_create(&self, token: &str) -> ServiceResult<Guest> {
        let mut conn = self.pool.acquire().await?;
        let guest = GuestRepo::new(&mut conn).get_or_create(token, Utc::now()).await?;
        Ok(guest)
    }
}
