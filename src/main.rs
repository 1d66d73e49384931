// Copyright 2026 CosmoDance Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};
use cosmodance_runtime::cli;
use cosmodance_runtime::config::EngineConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cosmodance",
    about = "CosmoDance studio info service — schedule & price acquisition engine",
    version
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to a TOML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,
    },
    /// Fetch and print the schedule
    Schedule {
        /// Filter to a single branch (free text, alias-matched)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Fetch and print the price list
    Prices,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let result = match cli.command {
        Commands::Serve { port } => cli::serve(config, port).await,
        Commands::Schedule { branch } => cli::schedule(config, branch.as_deref(), cli.json).await,
        Commands::Prices => cli::prices(config, cli.json).await,
    };

    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    result
}
