//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Cookie sessions persisted in SQLite
//! - Tracing and request timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use screenctl_core::{AccessMode, ScreenctlConfig};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use super::routes;
use crate::upload::{IconStore, UPLOADS_URL_PREFIX};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Upper bound on a single request's handling time
    pub request_timeout: Duration,

    /// Body limit for icon uploads
    pub max_upload_bytes: usize,

    /// How callers without a session are treated
    pub access_mode: AccessMode,

    /// Token of the shared guest identity
    pub guest_token: String,

    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,

    /// Mark the session cookie `Secure` (HTTPS deployments)
    pub secure_cookies: bool,

    /// Sessions expire after this many days without a request
    pub session_inactivity_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_settings(&ScreenctlConfig::default())
    }
}

impl ServerConfig {
    /// Build from the file/env configuration model.
    pub fn from_settings(settings: &ScreenctlConfig) -> Self {
        Self {
            bind_addr: settings.server.bind,
            cors_permissive: settings.server.cors_permissive,
            request_timeout: Duration::from_secs(settings.server.request_timeout_secs),
            max_upload_bytes: settings.server.max_upload_bytes,
            access_mode: settings.access.mode,
            guest_token: settings.access.guest_token.clone(),
            upload_dir: settings.storage.upload_dir.clone(),
            static_dir: settings.storage.static_dir.clone(),
            secure_cookies: settings.session.secure_cookies,
            session_inactivity_days: settings.session.inactivity_days,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: SqlitePool,
    pub config: ServerConfig,
    pub icons: IconStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: ServerConfig) -> Self {
        let icons = IconStore::new(config.upload_dir.clone());
        Self {
            pool,
            config,
            icons,
        }
    }
}

/// Build the full application router, including the session layer.
///
/// Creates the session table on first use. Schema migrations for the
/// application tables are the caller's job (see `db::migrations::run`).
pub async fn build_app(pool: SqlitePool, config: ServerConfig) -> Result<Router, ServerError> {
    let session_store = SqliteStore::new(pool.clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(session_expiry(config.session_inactivity_days)?);

    let cors = cors_layer(&config);
    let timeout = TimeoutLayer::new(config.request_timeout);
    let upload_dir = config.upload_dir.clone();
    let static_dir = config.static_dir.clone();
    let max_upload_bytes = config.max_upload_bytes;

    let state = Arc::new(AppState::new(pool, config));

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::applications::router())
        .merge(routes::screens::router())
        .merge(routes::upload::router(max_upload_bytes))
        .merge(routes::auth::router())
        .merge(routes::pages::router())
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(upload_dir))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(cors)
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Sliding session expiry of `days` (at least one) without activity
fn session_expiry(days: i64) -> Result<Expiry, ServerError> {
    let out_of_range =
        || ServerError::Config(format!("session.inactivity_days out of range: {days}"));

    let secs = u64::try_from(days.max(1))
        .ok()
        .and_then(|days| days.checked_mul(SECS_PER_DAY))
        .ok_or_else(out_of_range)?;
    let inactivity = std::time::Duration::from_secs(secs)
        .try_into()
        .map_err(|_| out_of_range())?;

    Ok(Expiry::OnInactivity(inactivity))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    // Localhost only, on the port we serve from
    let port = config.bind_addr.port();
    let origins: Vec<HeaderValue> = [
        format!("http://localhost:{}", port),
        format!("http://127.0.0.1:{}", port),
    ]
    .iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// migrations::run(&pool).await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: SqlitePool, config: ServerConfig) -> Result<(), ServerError> {
    let bind_addr = config.bind_addr;
    tracing::info!(
        access_mode = %config.access_mode,
        upload_dir = %config.upload_dir.display(),
        "starting screenctl server"
    );

    let app = build_app(pool, config).await?;

    // Bind listener
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
