// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `devbench plan` command: show what `run` would do.

use bench_report::MetricRegistry;
use bench_runner::CommandTemplate;
use std::path::PathBuf;

pub async fn execute(config_path: Option<PathBuf>, show_commands: bool) -> anyhow::Result<()> {
    super::banner("Experiment Plan");

    let config = super::load_config(config_path.as_deref())?;
    let specs = bench_matrix::expand_all(&config.matrix, &config.models)?;
    let targets = config.transport.resolved_targets();

    println!("  Experiment: {}", config.name);
    println!("  Transport:  {} → {}", config.transport.kind, targets.join(", "));
    println!(
        "  Runtime:    {}/{}",
        config.runtime.remote_dir.trim_end_matches('/'),
        config.runtime.executable
    );
    println!("  {}", config.matrix.summary());
    println!(
        "  Models:     {}",
        config
            .models
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let registry = MetricRegistry::default();
    println!("  Metrics:    {}", registry.names().collect::<Vec<_>>().join(", "));
    println!();

    // ── Specs ──────────────────────────────────────────────────
    let template = CommandTemplate::new(config.runtime.remote_dir.clone(), config.runtime.executable.clone());
    for (i, spec) in specs.iter().enumerate() {
        println!("  {:>4}  {}", i + 1, spec.label());
        if show_commands {
            println!("        $ {}", template.render(spec));
        }
    }
    println!();

    // ── Totals ─────────────────────────────────────────────────
    let policy = config.run_policy()?;
    let total = config.total_runs();
    println!("  Totals:");
    println!("   Specs:            {}", specs.len());
    println!("   Repeats:          {}", policy.repeats);
    println!("   Targets:          {}", targets.len());
    println!("   Measured runs:    {total}");
    if policy.warmup {
        println!(
            "   Warmup runs:      {}",
            config.models.len() * targets.len()
        );
    }
    let idle = policy.cooldown.as_secs_f64() * total.saturating_sub(targets.len()) as f64;
    if idle > 0.0 {
        println!("   Cooldown (min):   {:.0}s", idle);
    }
    println!();

    Ok(())
}
