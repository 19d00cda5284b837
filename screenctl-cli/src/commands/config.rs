use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use screenctl_core::ScreenctlConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file populated with defaults
    Init(InitArgs),
    /// Print the effective configuration (file plus environment overrides)
    Show(ShowArgs),
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,

    /// Config file to write (default: ~/.screenctl/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Config file to read (default: ~/.screenctl/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Path => {
            println!("{}", ScreenctlConfig::config_path().display());
            Ok(())
        }
    }
}

/// Load settings from `path` (or the default location), then apply
/// `SCREENCTL_*` environment overrides.
pub(crate) fn load_settings(path: Option<&Path>) -> Result<ScreenctlConfig> {
    match path {
        Some(path) => {
            let mut settings = ScreenctlConfig::load_from(path)?;
            settings
                .apply_overrides(|key| std::env::var(key).ok())
                .context("Invalid SCREENCTL_* environment override")?;
            Ok(settings)
        }
        None => ScreenctlConfig::load(),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let path = args.config.unwrap_or_else(ScreenctlConfig::config_path);

    ScreenctlConfig::default().write_to(&path, args.force)?;

    println!("Wrote config to {}", path.display());
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    print!("{}", settings.to_toml()?);
    Ok(())
}
