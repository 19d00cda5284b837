//! HTTP server layer
//!
//! Axum server with:
//! - JSON REST API under `/api`
//! - Form-based login/registration and page shells
//! - CORS (localhost only by default), tracing, timeouts
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_app, run_server, AppState, ServerConfig, ServerError};
