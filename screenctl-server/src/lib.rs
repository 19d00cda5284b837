//! screenctl-server: HTTP backend for the screen designer
//!
//! Stores applications and their screens (opaque JSON layouts) in SQLite,
//! manages accounts and cookie sessions, and accepts icon uploads.
//!
//! Layers, outermost first:
//! - `http`: axum routes, extractors, error mapping
//! - `services`: ownership and uniqueness rules, transactions
//! - `db`: pool, migrations, repositories
//! - `models`: validated input types

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod services;
pub mod upload;

pub use http::{build_app, run_server, ServerConfig, ServerError};
