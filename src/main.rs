//! alarmq - drive the alarm queue with concurrent producer/consumer scenarios.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use alarmq::commands::{self, scenarios::Scenario};

#[derive(Parser)]
#[command(name = "alarmq", version, about = "Run concurrent scenarios against the alarm queue")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run driver scenarios and check their ordering guarantees
    Run {
        /// Scenario to run (all scenarios when omitted)
        #[arg(value_enum)]
        scenario: Option<Scenario>,
        /// Number of runs per scenario (overrides the config file)
        #[arg(short, long)]
        runs: Option<u32>,
        /// Scenario config file (defaults to ./alarmq.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit logs as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Validate a scenario config file
    Check {
        /// Scenario config file (defaults to ./alarmq.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            runs,
            config,
            json,
        } => commands::run::execute(scenario, runs, config.as_deref(), json),
        Commands::Check { config } => commands::check::execute(config.as_deref()),
    }
}
