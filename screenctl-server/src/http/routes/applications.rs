//! Application endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::Application;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, Caller, ValidId};
use crate::http::server::AppState;
use crate::models::ApplicationName;
use crate::services::ApplicationService;

/// Create/update application request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub name: Option<String>,
    pub icon_path: Option<String>,
}

impl ApplicationRequest {
    fn name(&self) -> Result<ApplicationName, ApiError> {
        Ok(ApplicationName::new(self.name.as_deref().unwrap_or_default())?)
    }
}

/// Application response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: i64,
    pub name: String,
    pub icon_path: Option<String>,
    pub user_id: Option<i64>,
    pub guest_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Application> for ApplicationResponse {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            name: a.name,
            icon_path: a.icon_path,
            user_id: a.user_id,
            guest_id: a.guest_id,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

/// POST /api/applications
async fn create_application(
    State(state): State<Arc<AppState>>,
    Caller(owner): Caller,
    ApiJson(req): ApiJson<ApplicationRequest>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let name = req.name()?;
    let app = ApplicationService::new(&state.pool)
        .create(owner, name, req.icon_path)
        .await?;
    Ok(Json(app.into()))
}

/// GET /api/applications - the caller's applications, newest first
async fn list_applications(
    State(state): State<Arc<AppState>>,
    Caller(owner): Caller,
) -> Result<Json<Vec<ApplicationResponse>>, ApiError> {
    let apps = ApplicationService::new(&state.pool).list(owner).await?;
    Ok(Json(apps.into_iter().map(ApplicationResponse::from).collect()))
}

/// GET /api/applications/{id}
async fn get_application(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    ValidId(id): ValidId,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let app = ApplicationService::new(&state.pool).get(id).await?;
    Ok(Json(app.into()))
}

/// PUT /api/applications/{id}
async fn update_application(
    State(state): State<Arc<AppState>>,
    Caller(owner): Caller,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<ApplicationRequest>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let name = req.name()?;
    let app = ApplicationService::new(&state.pool)
        .update(owner, id, name, req.icon_path)
        .await?;
    Ok(Json(app.into()))
}

/// DELETE /api/applications/{id}
async fn delete_application(
    State(state): State<Arc<AppState>>,
    Caller(owner): Caller,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    ApplicationService::new(&state.pool).delete(owner, id).await?;
    Ok(StatusCode::OK)
}

/// Application routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/api/applications/{id}",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
}
