// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # devbench
//!
//! Command-line interface for benchmarking an inference runtime on remote
//! devices.
//!
//! ## Usage
//! ```bash
//! # Show what an experiment would run
//! devbench -c experiments/mnv2.toml plan --commands
//!
//! # Run it on every configured device, one device at a time
//! devbench -c experiments/mnv2.toml run
//!
//! # Check that the devices are reachable and cool
//! devbench -c experiments/mnv2.toml devices
//!
//! # Re-aggregate a saved raw results file
//! devbench aggregate results/mnv2_R58M1234_20250101-120000.raw.jsonl
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devbench",
    about = "Matrix benchmarking of an inference runtime on remote devices over ADB or SSH",
    version,
    author
)]
struct Cli {
    /// Path to the experiment TOML file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the experiment and write reports.
    Run {
        /// Run every device at the same time instead of one after another.
        #[arg(long)]
        parallel: bool,

        /// Echo commands locally instead of sending them to devices.
        #[arg(long)]
        dry_run: bool,

        /// Report directory (overrides `report.output_dir`).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the expanded matrix and total run count without executing.
    Plan {
        /// Also print the exact command line of every spec.
        #[arg(long = "commands")]
        show_commands: bool,
    },

    /// Extract metrics from a saved benchmark output file.
    Parse {
        /// File holding the benchmark tool's stdout.
        file: PathBuf,

        /// Print metrics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Aggregate a raw results file written by `run`.
    Aggregate {
        /// Raw results (JSON Lines).
        raw: PathBuf,

        /// Report directory (overrides `report.output_dir`).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List the configured devices and check each one.
    Devices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            parallel,
            dry_run,
            output_dir,
        } => {
            let status = commands::run::execute(cli.config, parallel, dry_run, output_dir).await?;
            if !status.is_complete() {
                std::process::exit(status.exit_code());
            }
            Ok(())
        }
        Commands::Plan { show_commands } => commands::plan::execute(cli.config, show_commands).await,
        Commands::Parse { file, json } => commands::parse::execute(file, json).await,
        Commands::Aggregate { raw, output_dir } => {
            commands::aggregate::execute(cli.config, raw, output_dir).await
        }
        Commands::Devices => commands::devices::execute(cli.config).await,
    }
}
