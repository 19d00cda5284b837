//! `screenctl serve`: run the screen designer HTTP server
//!
//! Settings resolve in order: defaults, config file, `SCREENCTL_*`
//! environment, then the flags below.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use screenctl_core::AccessMode;
use screenctl_server::db::{create_pool_with_options, migrations};
use screenctl_server::{run_server, ServerConfig};

use super::config::load_settings;

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (e.g. 127.0.0.1:8080)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (e.g. sqlite://./screenctl.db)
    #[arg(long, env = "SCREENCTL_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Treat callers without a session as the shared guest identity
    #[arg(long, value_parser = parse_access_mode)]
    pub access_mode: Option<AccessMode>,

    /// Directory receiving uploaded icons
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Directory served under /static (designer scripts and styles)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Allow any CORS origin (default: localhost only)
    #[arg(long)]
    pub cors_permissive: bool,

    /// Mark session cookies Secure (serve behind HTTPS)
    #[arg(long)]
    pub secure_cookies: bool,

    /// Config file (default: ~/.screenctl/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn parse_access_mode(value: &str) -> Result<AccessMode, String> {
    value.parse().map_err(|e: screenctl_core::CoreError| e.to_string())
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut settings = load_settings(args.config.as_deref())?;

    if let Some(bind) = args.bind {
        settings.server.bind = bind;
    }
    if let Some(url) = args.database_url {
        settings.database.url = url;
    }
    if let Some(mode) = args.access_mode {
        settings.access.mode = mode;
    }
    if let Some(dir) = args.upload_dir {
        settings.storage.upload_dir = dir;
    }
    if let Some(dir) = args.static_dir {
        settings.storage.static_dir = dir;
    }
    settings.server.cors_permissive |= args.cors_permissive;
    settings.session.secure_cookies |= args.secure_cookies;

    let pool = create_pool_with_options(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", settings.database.url))?;

    migrations::run(&pool)
        .await
        .context("Failed to run database migrations")?;

    run_server(pool, ServerConfig::from_settings(&settings))
        .await
        .context("Server error")
}
