//! Screen use cases
//!
//! Every write also bumps the parent application's `updated_at` inside the
//! same transaction.

use chrono::Utc;
use sqlx::SqlitePool;

use super::{ensure_owner, non_blank, ServiceResult};
use crate::db::{ApplicationRepo, Screen, ScreenRepo};
use crate::models::{Owner, ScreenName};

const SCREEN_ACTION: &str = "change screens of";

pub struct ScreenService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ScreenService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner: Owner,
        application_id: i64,
        name: ScreenName,
        layout_json: String,
        image_path: Option<String>,
    ) -> ServiceResult<Screen> {
        let image_path = non_blank(image_path);
        let mut tx = self.pool.begin().await?;

        let app = ApplicationRepo::new(&mut tx).get(application_id).await?;
        ensure_owner(&app, owner, SCREEN_ACTION)?;

        let now = Utc::now();
        let screen = ScreenRepo::new(&mut tx)
            .insert(app.id, &name, &layout_json, image_path.as_deref(), now)
            .await?;
        ApplicationRepo::new(&mut tx).touch(app.id, now).await?;

        tx.commit().await?;
        tracing::info!(screen_id = screen.id, application_id = app.id, "screen created");
        Ok(screen)
    }

    /// Screens of an existing application, newest first.
    pub async fn list(&self, application_id: i64) -> ServiceResult<Vec<Screen>> {
        let mut conn = self.pool.acquire().await?;
        ApplicationRepo::new(&mut conn).get(application_id).await?;
        Ok(ScreenRepo::new(&mut conn)
            .list_for_application(application_id)
            .await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Screen> {
        let mut conn = self.pool.acquire().await?;
        Ok(ScreenRepo::new(&mut conn).get(id).await?)
    }

    pub async fn update(
        &self,
        owner: Owner,
        id: i64,
        name: ScreenName,
        layout_json: String,
        image_path: Option<String>,
    ) -> ServiceResult<Screen> {
        let image_path = non_blank(image_path);
        let mut tx = self.pool.begin().await?;

        let application_id = self.authorize(&mut tx, owner, id).await?;
        let screen = ScreenRepo::new(&mut tx)
            .update(id, &name, &layout_json, image_path.as_deref())
            .await?;
        ApplicationRepo::new(&mut tx).touch(application_id, Utc::now()).await?;

        tx.commit().await?;
        tracing::info!(screen_id = id, application_id, "screen updated");
        Ok(screen)
    }

    /// Replace only the layout; name and image path stay as they are.
    pub async fn update_layout(
        &self,
        owner: Owner,
        id: i64,
        layout_json: String,
    ) -> ServiceResult<Screen> {
        let mut tx = self.pool.begin().await?;

        let application_id = self.authorize(&mut tx, owner, id).await?;
        let screen = ScreenRepo::new(&mut tx).update_layout(id, &layout_json).await?;
        ApplicationRepo::new(&mut tx).touch(application_id, Utc::now()).await?;

        tx.commit().await?;
        tracing::debug!(screen_id = id, bytes = layout_json.len(), "screen layout saved");
        Ok(screen)
    }

    pub async fn delete(&self, owner: Owner, id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let application_id = self.authorize(&mut tx, owner, id).await?;
        ScreenRepo::new(&mut tx).delete(id).await?;
        ApplicationRepo::new(&mut tx).touch(application_id, Utc::now()).await?;

        tx.commit().await?;
        tracing::info!(screen_id = id, application_id, "screen deleted");
        Ok(())
    }

    /// Load the screen and its parent, and check the caller owns the parent.
    /// Returns the parent's id.
    async fn authorize(
        &self,
        conn: &mut sqlx::SqliteConnection,
        owner: Owner,
        screen_id: i64,
    ) -> ServiceResult<i64> {
        let screen = ScreenRepo::new(conn).get(screen_id).await?;
        let app = ApplicationRepo::new(conn).get(screen.application_id).await?;
        ensure_owner(&app, owner, SCREEN_ACTION)?;
        Ok(app.id)
    }
}
