//! screenctl - screen designer server and tooling
//!
//! - `serve`: run the HTTP server (REST API, login pages, designer shell, icon uploads)
//! - `config`: inspect or scaffold `~/.screenctl/config.toml`
//! - `layout`: decode a saved `layoutJson` blob offline

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "screenctl",
    author,
    version,
    about = "Screen designer backend: applications, screens and layouts over HTTP",
    long_about = "Run the screen designer server backed by SQLite, manage its configuration, \
                  and inspect layout documents produced by the browser designer."
)]
struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(commands::ServeArgs),
    /// Manage screenctl configuration
    Config(commands::ConfigArgs),
    /// Work with layout documents
    Layout(commands::LayoutArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Project .env first, then ~/.screenctl/.env; existing variables win
    dotenvy::dotenv().ok();
    dotenvy::from_path(screenctl_core::ScreenctlConfig::home_dir().join(".env")).ok();

    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Config(args) => commands::run_config(args),
        Commands::Layout(args) => commands::run_layout(args),
    };

    tracing_setup::shutdown_otel();
    result
}
