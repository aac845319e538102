// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `devbench parse` command: extract metrics from a saved output file.

use anyhow::Context;
use bench_report::MetricRegistry;
use std::path::PathBuf;

pub async fn execute(file: PathBuf, json: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("cannot read '{}'", file.display()))?;
    let metrics = MetricRegistry::default().parse(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    if metrics.is_empty() {
        println!("  No metrics found in {}", file.display());
        return Ok(());
    }
    for (name, value) in &metrics {
        println!("  {name:<20} {value:>12}");
    }
    Ok(())
}
