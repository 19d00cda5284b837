//! `screenctl layout`: offline inspection of designer layouts

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use screenctl_core::Layout;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
pub struct LayoutArgs {
    #[command(subcommand)]
    pub command: LayoutCommands,
}

#[derive(Subcommand, Debug)]
pub enum LayoutCommands {
    /// Summarize a layout file (component counts and canvas extent)
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Layout JSON array, or a screen object carrying `layoutJson`
    pub file: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_layout(args: LayoutArgs) -> Result<()> {
    match args.command {
        LayoutCommands::Inspect(args) => run_inspect(args),
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let layout = decode(&content)
        .with_context(|| format!("{} is not a screen layout", args.file.display()))?;

    let (width, height) = layout.extent();
    let summary = layout.summary();

    if args.json {
        let report = json!({
            "components": layout.components().len(),
            "types": summary,
            "extent": { "width": width, "height": height },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Components: {}", layout.components().len());
    for (kind, count) in &summary {
        println!("  {kind:<12} {count}");
    }
    println!("Extent: {width}x{height}");
    Ok(())
}

/// Accept either a bare component array or a `ScreenResponse` export,
/// whose `layoutJson` field holds the array as a string.
fn decode(content: &str) -> Result<Layout> {
    let value: Value = serde_json::from_str(content).context("Invalid JSON")?;

    if let Some(embedded) = value.get("layoutJson").and_then(Value::as_str) {
        return Ok(Layout::parse(embedded)?);
    }

    Ok(Layout::parse(content)?)
}
