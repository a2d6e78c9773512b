//! Drift CLI
//!
//! Replays a scripted drag against the infinite list or the carousel and
//! prints where the widget came to rest as JSON.

mod config;
mod simulate;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::DriftConfig;
use crate::simulate::Script;

/// Replay scripted drags against Drift widgets
#[derive(Parser, Debug)]
#[command(name = "drift")]
#[command(about = "Replay scripted drags against Drift scroll widgets")]
#[command(version)]
struct Cli {
    /// Configuration file or directory containing drift.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drag the infinite list vertically
    List(RunArgs),
    /// Drag the carousel horizontally
    Carousel(RunArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Maximum frames to step after release
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Total pointer travel (negative drags down or left)
    #[arg(long, default_value_t = 400.0, allow_hyphen_values = true)]
    drag: f32,

    /// Frames the drag is spread over
    #[arg(long, default_value_t = 20)]
    drag_frames: usize,
}

impl RunArgs {
    fn script(&self) -> Result<Script> {
        Script::new(self.fps, self.drag, self.drag_frames, self.frames)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = DriftConfig::load_or_default(cli.config.as_deref())?;

    let output = match &cli.command {
        Command::List(args) => {
            let summary = simulate::run_list(&config, &args.script()?)?;
            tracing::info!(
                "list settled at target_index={} after {} frames",
                summary.target_index,
                summary.frames
            );
            serde_json::to_string_pretty(&summary)
        }
        Command::Carousel(args) => {
            let summary = simulate::run_carousel(&config, &args.script()?)?;
            tracing::info!(
                "carousel settled at x={:.1} after {} frames",
                summary.position_x,
                summary.frames
            );
            serde_json::to_string_pretty(&summary)
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
    }
    .context("Failed to serialize summary")?;

    println!("{output}");
    Ok(())
}
