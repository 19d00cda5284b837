//! Subcommand implementations

mod config;
mod layout;
mod serve;

pub use config::{run_config, ConfigArgs};
pub use layout::{run_layout, LayoutArgs};
pub use serve::{run_serve, ServeArgs};
