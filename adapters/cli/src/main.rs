#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Sky Battle experience.

mod autopilot;
mod config;
mod headless;
mod play;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use sky_battle_core::LevelId;
use sky_battle_system_campaign::{Campaign, Session};
use tracing::error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::{
    autopilot::Autopilot,
    config::{load_tuning, TuningOverrides},
};

/// Command-line arguments accepted by the `sky-battle` binary.
#[derive(Debug, Parser)]
#[command(name = "sky-battle", about = "Side-scrolling shooter: clear the squadron, then the boss")]
struct Args {
    /// Seed every gameplay random decision derives from.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML file overriding the default tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Play without a window, driven by the autopilot.
    #[arg(long)]
    headless: bool,
    /// Tick budget for headless runs.
    #[arg(long, default_value_t = 6_000)]
    max_ticks: u64,
    /// Ticks between two autopilot shots.
    #[arg(long, default_value_t = 4)]
    fire_every: u64,
    /// Level the session starts at.
    #[arg(long)]
    start_level: Option<u32>,
    /// Per-frame probability that the boss raises its shield.
    #[arg(long)]
    shield_probability: Option<f64>,
    /// Frames the boss shield stays raised.
    #[arg(long)]
    shield_duration: Option<u32>,
    /// Disable vertical synchronisation in windowed mode.
    #[arg(long)]
    no_vsync: bool,
}

/// Entry point for the Sky Battle command-line interface.
fn main() -> ExitCode {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!("{failure:#}");
            eprintln!("error: {failure:#}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the log filter from `RUST_LOG` directives, falling back to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn run(args: Args) -> Result<()> {
    let tuning = load_tuning(
        args.tuning.as_deref(),
        TuningOverrides {
            shield_probability: args.shield_probability,
            shield_duration: args.shield_duration,
        },
    )?;
    let campaign = Campaign::standard();
    let start = args.start_level.map_or(campaign.first(), LevelId::new);
    let session = Session::starting_at(campaign, tuning, args.seed, start)?;

    if args.headless {
        let summary = headless::run(session, Autopilot::new(args.fire_every), args.max_ticks)?;
        println!("{summary}");
        Ok(())
    } else {
        play::run(session, !args.no_vsync)
    }
}
