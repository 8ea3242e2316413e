//! well-controls - production control resolution driver
//!
//! Replays the production keywords of one well through the control resolvers
//! and prints the resolved state of every report step as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a schedule
//! well-controls resolve --input op1_schedule.json --pretty
//!
//! # Validate a config file
//! well-controls --config well_controls.toml check-config
//! ```
//!
//! # Environment Variables
//!
//! - `WELL_CONTROLS_CONFIG`: Path to config file (when `--config` is not given)
//! - `RUST_LOG`: Logging filter (default: `logging.level` from config)

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use well_controls::config::{self, validation, ControlsConfig, LoggingConfig};
use well_controls::{ControlResolver, ControlSchedule, ControlSequence, ProductionControls};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "well-controls")]
#[command(about = "Resolve well production controls from schedule keyword records")]
#[command(version)]
struct CliArgs {
    /// Config file to use instead of the standard search order
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Resolve every step of a well schedule (JSON) and print the states
    Resolve {
        /// Schedule file: { "well": "...", "steps": [...] }
        #[arg(long, short)]
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Load and validate the configuration, then print the effective values
    CheckConfig,
}

#[derive(Serialize)]
struct ResolvedSchedule<'a> {
    well: &'a str,
    states: &'a [ProductionControls],
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let cfg = match &args.config {
        Some(path) => ControlsConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ControlsConfig::load(),
    };
    init_tracing(&cfg.logging);
    config::init(cfg);

    match args.command {
        SubCommand::Resolve { input, pretty } => resolve(&input, pretty),
        SubCommand::CheckConfig => check_config(args.config.as_deref()),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve(input: &Path, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading schedule {}", input.display()))?;
    let schedule: ControlSchedule = serde_json::from_str(&raw)
        .with_context(|| format!("parsing schedule {}", input.display()))?;

    let resolver = ControlResolver::new((&config::get().resolver).into());
    let mut sequence = ControlSequence::new(&schedule.well, resolver);
    info!(well = %schedule.well, steps = schedule.steps.len(), "resolving schedule");

    for (index, step) in schedule.steps.iter().enumerate() {
        sequence.apply(step).with_context(|| {
            format!(
                "well {} report step {} ({})",
                schedule.well,
                index + 1,
                step.keyword()
            )
        })?;
    }

    let output = ResolvedSchedule {
        well: sequence.well(),
        states: sequence.states(),
    };
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

fn check_config(path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        for w in validation::validate_unknown_keys(&raw) {
            println!("warning: {w}");
        }
    }

    let cfg = config::get();
    for w in validation::validate_physical_ranges(cfg) {
        println!("warning: {w}");
    }
    print!("{}", cfg.to_toml()?);
    Ok(())
}
