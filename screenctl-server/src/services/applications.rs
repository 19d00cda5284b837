//! Application use cases

use chrono::Utc;
use sqlx::SqlitePool;

use super::{ensure_owner, non_blank, ServiceResult};
use crate::db::{Application, ApplicationRepo};
use crate::models::{ApplicationName, Owner};

pub struct ApplicationService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApplicationService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an application for `owner`. A name the owner already uses is
    /// a `Conflict`.
    pub async fn create(
        &self,
        owner: Owner,
        name: ApplicationName,
        icon_path: Option<String>,
    ) -> ServiceResult<Application> {
        let icon_path = non_blank(icon_path);
        let mut conn = self.pool.acquire().await?;

        let app = ApplicationRepo::new(&mut conn)
            .insert(owner, &name, icon_path.as_deref(), Utc::now())
            .await?;

        tracing::info!(
            application_id = app.id,
            owner = %owner,
            name = %app.name,
            "application created"
        );
        Ok(app)
    }

    pub async fn list(&self, owner: Owner) -> ServiceResult<Vec<Application>> {
        let mut conn = self.pool.acquire().await?;
        Ok(ApplicationRepo::new(&mut conn).list_for_owner(owner).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Application> {
        let mut conn = self.pool.acquire().await?;
        Ok(ApplicationRepo::new(&mut conn).get(id).await?)
    }

    /// Rename, and replace the icon only when a non-blank path is given.
    pub async fn update(
        &self,
        owner: Owner,
        id: i64,
        name: ApplicationName,
        icon_path: Option<String>,
    ) -> ServiceResult<Application> {
        let icon_path = non_blank(icon_path);
        let mut tx = self.pool.begin().await?;
        let mut repo = ApplicationRepo::new(&mut tx);

        let existing = repo.get(id).await?;
        ensure_owner(&existing, owner, "edit")?;
        let updated = repo
            .update(id, &name, icon_path.as_deref(), Utc::now())
            .await?;

        tx.commit().await?;
        tracing::info!(application_id = id, "application updated");
        Ok(updated)
    }

    /// Delete the application and, through the cascade, its screens.
    pub async fn delete(&self, owner: Owner, id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;
        let mut repo = ApplicationRepo::new(&mut tx);

        let existing = repo.get(id).await?;
        ensure_owner(&existing, owner, "delete")?;
        repo.delete(id).await?;

        tx.commit().await?;
        tracing::info!(application_id = id, "application deleted");
        Ok(())
    }

    pub async fn touch_updated_at(&self, id: i64) -> ServiceResult<()> {
        let mut conn = self.pool.acquire().await?;
        ApplicationRepo::new(&mut conn).touch(id, Utc::now()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;
    use crate::services::{GuestService, ServiceError};

    fn name(s: &str) -> ApplicationName {
        ApplicationName::new(s).unwrap()
    }

    async fn owners(pool: &SqlitePool) -> (Owner, Owner) {
        let guests = GuestService::new(pool);
        let a = guests.get_or_create("guest_a").await.unwrap();
        let b = guests.get_or_create("guest_b").await.unwrap();
        (Owner::Guest(a.id), Owner::Guest(b.id))
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_for_same_owner() {
        let pool = connect_memory().await.unwrap();
        let (alice, bob) = owners(&pool).await;
        let service = ApplicationService::new(&pool);

        service.create(alice, name("App1"), None).await.unwrap();
        let err = service.create(alice, name("App1"), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));

        service.create(bob, name("App1"), None).await.unwrap();
    }

    #[tokio::test]
    async fn blank_icon_is_stored_as_none() {
        let pool = connect_memory().await.unwrap();
        let (alice, _) = owners(&pool).await;
        let service = ApplicationService::new(&pool);

        let app = service
            .create(alice, name("App"), Some("   ".into()))
            .await
            .unwrap();
        assert_eq!(app.icon_path, None);
    }

    #[tokio::test]
    async fn update_by_stranger_is_forbidden() {
        let pool = connect_memory().await.unwrap();
        let (alice, bob) = owners(&pool).await;
        let service = ApplicationService::new(&pool);

        let app = service.create(alice, name("App"), None).await.unwrap();
        let err = service
            .update(bob, app.id, name("Stolen"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden { .. }));

        let err = service.delete(bob, app.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden { .. }));

        assert_eq!(service.get(app.id).await.unwrap().name, "App");
    }

    #[tokio::test]
    async fn update_keeps_icon_on_blank_path() {
        let pool = connect_memory().await.unwrap();
        let (alice, _) = owners(&pool).await;
        let service = ApplicationService::new(&pool);

        let app = service
            .create(alice, name("App"), Some("/uploads/icon_1.png".into()))
            .await
            .unwrap();
        let updated = service
            .update(alice, app.id, name("App v2"), Some(String::new()))
            .await
            .unwrap();

        assert_eq!(updated.name, "App v2");
        assert_eq!(updated.icon_path.as_deref(), Some("/uploads/icon_1.png"));
        assert!(updated.updated_at >= app.updated_at);
    }

    #[tokio::test]
    async fn rename_onto_sibling_conflicts() {
        let pool = connect_memory().await.unwrap();
        let (alice, _) = owners(&pool).await;
        let service = ApplicationService::new(&pool);

        service.create(alice, name("One"), None).await.unwrap();
        let two = service.create(alice, name("Two"), None).await.unwrap();

        let err = service.update(alice, two.id, name("One"), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));
    }

    #[tokio::test]
    async fn list_only_returns_own_applications() {
        let pool = connect_memory().await.unwrap();
        let (alice, bob) = owners(&pool).await;
        let service = ApplicationService::new(&pool);

        service.create(alice, name("A1"), None).await.unwrap();
        service.create(bob, name("B1"), None).await.unwrap();

        let listed = service.list(alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "A1");
    }

    #[tokio::test]
    async fn missing_application_is_not_found() {
        let pool = connect_memory().await.unwrap();
        let (alice, _) = owners(&pool).await;
        let service = ApplicationService::new(&pool);

        assert!(matches!(service.get(9).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(service.delete(alice, 9).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(service.touch_updated_at(9).await, Err(ServiceError::NotFound { .. })));
    }
}
