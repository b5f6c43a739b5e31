#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for finding authoritative streets missing from
//! OpenStreetMap.
//!
//! Uses `indicatif-log-bridge` (via [`missing_streets_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use missing_streets_cli::config::{self, PathOverrides};
use missing_streets_cli::pipeline;

#[derive(Parser)]
#[command(
    name = "missing_streets",
    about = "Report authoritative streets that are missing from OpenStreetMap"
)]
struct Cli {
    /// TOML config file (defaults are built in)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    paths: PathOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build both street indexes and save them to the data directory
    Preprocess,
    /// Match previously saved indexes and write the missing streets
    Conflate,
    /// Build, match, and write in one pass
    Run {
        /// Also save the intermediate indexes
        #[arg(long)]
        keep_indexes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = missing_streets_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    cli.paths.apply(&mut config.paths);

    match cli.command {
        Commands::Preprocess => pipeline::preprocess(&config, &multi).await?,
        Commands::Conflate => {
            let missing = pipeline::conflate(&config, &multi).await?;
            log::info!("{missing} authoritative streets are missing from OSM");
        }
        Commands::Run { keep_indexes } => {
            let missing = pipeline::run(&config, &multi, keep_indexes).await?;
            log::info!("{missing} authoritative streets are missing from OSM");
        }
    }

    Ok(())
}
