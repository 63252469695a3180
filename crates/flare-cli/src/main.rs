//! Flare CLI - Headless driver for the Flare effect layers

mod commands;
mod config;
mod timeline;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::simulate;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "flare")]
#[command(about = "Particles, music and dash wings for a 3D arcade game, simulated headlessly", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the effect layers against a scripted event timeline
    Simulate {
        /// Path to the timeline TOML file
        #[arg(long)]
        timeline: PathBuf,

        /// Path to flare.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seconds to simulate (default: last event + 2s)
        #[arg(long)]
        seconds: Option<f64>,

        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,

        /// Never open an audio device
        #[arg(long)]
        silent: bool,
    },

    /// Print the default configuration, or validate and print a config file
    Config {
        /// Path to flare.toml
        path: Option<PathBuf>,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            timeline,
            config,
            seconds,
            fps,
            format,
            silent,
        } => simulate::run(simulate::SimulateArgs {
            timeline,
            config,
            seconds,
            fps,
            format,
            silent,
        }),
        Commands::Config { path } => commands::config::run(path.as_deref()),
    }
}
