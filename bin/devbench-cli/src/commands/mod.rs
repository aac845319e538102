// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the helpers they share.

pub mod aggregate;
pub mod devices;
pub mod parse;
pub mod plan;
pub mod run;

use anyhow::Context;
use bench_report::AggregatedRecord;
use bench_runner::ExperimentConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` count picks the level.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads and validates the experiment named by `--config`.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ExperimentConfig> {
    let path = path.context("this command needs an experiment file: pass --config <FILE>")?;
    let config = ExperimentConfig::from_file(path)?;
    config
        .validate()
        .with_context(|| format!("invalid experiment '{}'", path.display()))?;
    tracing::info!("loaded experiment '{}' from {}", config.name, path.display());
    Ok(config)
}

/// Report directory: the flag, then the experiment file, then `results`.
pub fn resolve_output_dir(flag: Option<PathBuf>, config: Option<&ExperimentConfig>) -> PathBuf {
    flag.or_else(|| config.map(|c| c.report.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("results"))
}

pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║  {:<52}║", format!("devbench · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}

/// Prints one row per configuration with the headline metrics.
pub fn print_records(target: &str, records: &[AggregatedRecord]) {
    println!("  Target: {target}");
    println!(
        "  {:<18} {:<4} {:<5} {:>6} {:>5} {:>5} {:>5} {:<5} {:>6} {:>10} {:>10}",
        "Model", "Dev", "API", "niter", "nireq", "nstr", "nthr", "Prec", "Runs", "FPS", "Lat ms",
    );
    println!("  {}", "-".repeat(96));

    for r in records {
        let s = &r.spec;
        let fps = r
            .metric("throughput")
            .map(|m| format!("{:.2}", m.median))
            .unwrap_or_else(|| "-".into());
        let latency = r
            .metric("latency_median")
            .map(|m| format!("{:.2}", m.median))
            .unwrap_or_else(|| "-".into());
        let (nireq, nstreams, nthreads) = match s.hint {
            Some(_) => ("-".to_string(), "-".to_string(), "-".to_string()),
            None => (s.nireq.to_string(), s.nstreams.to_string(), s.nthreads.to_string()),
        };
        println!(
            "  {:<18} {:<4} {:<5} {:>6} {:>5} {:>5} {:>5} {:<5} {:>6} {:>10} {:>10}",
            truncate(&s.model, 18),
            s.device,
            s.api,
            s.niter,
            nireq,
            nstreams,
            nthreads,
            s.precision,
            format!("{}/{}", r.successes, r.repeats),
            fps,
            latency,
        );
    }
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}…")
    }
}
