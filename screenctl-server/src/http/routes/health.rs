//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

async fn check_database(pool: &SqlitePool) -> (StatusCode, HealthResponse) {
    let database_ok = sqlx::query("SELECT 1").execute(pool).await.is_ok();

    let (status, code, database) = if database_ok {
        ("ok", StatusCode::OK, "ok")
    } else {
        tracing::error!("health check: database unreachable");
        ("degraded", StatusCode::SERVICE_UNAVAILABLE, "unreachable")
    };

    (
        code,
        HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
        },
    )
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, body) = check_database(&state.pool).await;
    (code, Json(body))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok() {
        let pool = crate::db::create_memory_pool().await.unwrap();
        let (code, body) = check_database(&pool).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn closed_pool_is_degraded() {
        let pool = crate::db::create_memory_pool().await.unwrap();
        pool.close().await;

        let (code, body) = check_database(&pool).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.database, "unreachable");
    }
}
