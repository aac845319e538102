// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `devbench run` command: execute the experiment on every target.
//!
//! Each target gets its own sequencer on a blocking task. Without
//! `--parallel` the targets run one after another; with it they all start
//! at once. Raw results, aggregated reports and a console table are
//! produced per target.

use anyhow::Context;
use bench_matrix::BenchmarkSpec;
use bench_report::{aggregate_results, AggregatedRecord, MetricRegistry, ReportStatus, ReportWriter};
use bench_runner::{
    ExecutionResult, ExperimentConfig, RunPolicy, RunSequencer, RunnerError, SequencerConfig,
};
use device_exec::{CommandOutput, ExecError, LocalExecutor, RemoteExecutor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub async fn execute(
    config_path: Option<PathBuf>,
    parallel: bool,
    dry_run: bool,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<ReportStatus> {
    super::banner("Benchmark Run");

    let config = super::load_config(config_path.as_deref())?;
    let specs = Arc::new(bench_matrix::expand_all(&config.matrix, &config.models)?);
    let policy = effective_policy(&config, dry_run)?;
    let targets = config.transport.resolved_targets();

    let executor: Arc<dyn RemoteExecutor> = if dry_run {
        Arc::new(EchoExecutor::default())
    } else {
        config.transport.create_executor()
    };

    println!("  Experiment: {}", config.name);
    println!("  Transport:  {} ({})", executor.name(), targets.join(", "));
    println!("  {}", config.matrix.summary());
    println!(
        "  Policy:     {} repeats, cooldown {:.1}s, timeout {}, warmup {}",
        policy.repeats,
        policy.cooldown.as_secs_f64(),
        policy
            .timeout
            .map(|t| format!("{:.0}s", t.as_secs_f64()))
            .unwrap_or_else(|| "none".into()),
        if policy.warmup { "on" } else { "off" },
    );
    println!("  Total runs: {}", config.total_runs());
    if dry_run {
        println!("  Mode:       dry run (commands are echoed locally, no cooldown)");
    }
    println!();

    let started = Instant::now();
    let batches = run_targets(&executor, &config, &targets, &specs, &policy, parallel).await?;

    // ── Reports ────────────────────────────────────────────────
    let writer = ReportWriter::new(super::resolve_output_dir(output_dir, Some(&config)), &config.name);
    let registry = MetricRegistry::default();
    let mut all_records: Vec<AggregatedRecord> = Vec::new();

    for (target, results) in &batches {
        if config.report.save_raw {
            writer.write_raw(results, target)?;
        }
        let records = aggregate_results(results, &registry);
        let written = writer.write_reports(&records, target, &config.report.formats)?;
        super::print_records(target, &records);
        for path in written {
            println!("  Wrote {}", path.display());
        }
        println!();
        all_records.extend(records);
    }

    // ── Summary ────────────────────────────────────────────────
    let status = ReportStatus::evaluate(&all_records, config.total_runs());
    println!("  Summary:");
    println!("   Elapsed:          {:.1}s", started.elapsed().as_secs_f64());
    println!("   Configurations:   {}", all_records.len());
    println!("   Reports:          {}", writer.output_dir().display());
    println!("   Status:           {status}");
    println!();

    if !status.is_complete() {
        tracing::warn!("batch did not complete cleanly: {status}");
    }
    Ok(status)
}

/// Runs every target and returns `(target, results)` in target order.
async fn run_targets(
    executor: &Arc<dyn RemoteExecutor>,
    config: &ExperimentConfig,
    targets: &[String],
    specs: &Arc<Vec<BenchmarkSpec>>,
    policy: &RunPolicy,
    parallel: bool,
) -> anyhow::Result<Vec<(String, Vec<ExecutionResult>)>> {
    let mut batches = Vec::with_capacity(targets.len());
    let mut pending = Vec::new();

    for target in targets {
        let task = {
            let executor = Arc::clone(executor);
            let specs = Arc::clone(specs);
            let policy = policy.clone();
            let seq_config = config.sequencer_config(target);
            tokio::task::spawn_blocking(move || run_target(executor, seq_config, &specs, &policy))
        };

        if parallel {
            pending.push((target.clone(), task));
        } else {
            let results = task
                .await
                .with_context(|| format!("run task for '{target}' panicked"))??;
            batches.push((target.clone(), results));
        }
    }

    for (target, task) in pending {
        let results = task
            .await
            .with_context(|| format!("run task for '{target}' panicked"))??;
        batches.push((target, results));
    }
    Ok(batches)
}

fn run_target(
    executor: Arc<dyn RemoteExecutor>,
    config: SequencerConfig,
    specs: &[BenchmarkSpec],
    policy: &RunPolicy,
) -> Result<Vec<ExecutionResult>, RunnerError> {
    let label = config.target.clone();
    let mut sequencer = RunSequencer::new(executor, config).on_progress(move |done, total| {
        println!("  [{label}] {done:>4}/{total}");
    });
    tracing::info!("starting {} specs on '{}'", specs.len(), sequencer.target());
    sequencer.run_matrix(specs, policy)
}

/// The experiment's policy, with cooldowns dropped for dry runs.
fn effective_policy(config: &ExperimentConfig, dry_run: bool) -> anyhow::Result<RunPolicy> {
    let mut policy = config.run_policy()?;
    if dry_run {
        policy.cooldown = Duration::ZERO;
    }
    Ok(policy)
}

/// Prints commands through the local shell instead of running them.
///
/// Each echoed command reports a throughput of zero so the rest of the
/// pipeline (parse, aggregate, write) runs end to end.
#[derive(Debug, Default)]
struct EchoExecutor {
    local: LocalExecutor,
}

impl RemoteExecutor for EchoExecutor {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn execute(
        &self,
        target: &str,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError> {
        let echo = format!("echo {} && echo 'Throughput: 0.00 FPS'", quote(&format!("[{target}] {command}")));
        self.local.execute(target, &echo, timeout)
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("a b"), "'a b'");
        assert_eq!(quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_dry_run_skips_cooldown() {
        let config = ExperimentConfig::from_toml(
            r#"
name = "dry"
[policy]
repeats = 2
cooldown_secs = 30.0
[[models]]
name = "m"
path = "m.xml"
"#,
        )
        .unwrap();
        assert_eq!(effective_policy(&config, true).unwrap().cooldown, Duration::ZERO);
        assert_eq!(
            effective_policy(&config, false).unwrap().cooldown,
            Duration::from_secs(30)
        );
        assert_eq!(effective_policy(&config, true).unwrap().repeats, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_echo_executor_prints_command() {
        let exec = EchoExecutor::default();
        let out = exec
            .execute("dev0", "cd /tmp && ./benchmark_app -niter 5", Some(Duration::from_secs(10)))
            .unwrap();
        assert!(out.success());
        assert!(out.stdout.starts_with("[dev0] cd /tmp && ./benchmark_app -niter 5\n"));
        assert!(bench_report::parse(&out.stdout).contains_key("throughput"));
    }
}
