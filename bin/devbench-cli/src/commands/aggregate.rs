// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `devbench aggregate` command: rebuild reports from a raw results file.
//!
//! Useful after adding a metric pattern: the saved stdout is parsed again,
//! no device is touched.

use anyhow::Context;
use bench_report::sink::{read_raw_jsonl, sanitize};
use bench_report::{aggregate_results, MetricRegistry, ReportWriter};
use bench_runner::{ExecutionResult, ReportFormat};
use std::path::{Path, PathBuf};

pub async fn execute(
    config_path: Option<PathBuf>,
    raw: PathBuf,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    super::banner("Aggregate");

    let config = match config_path.as_deref() {
        Some(_) => Some(super::load_config(config_path.as_deref())?),
        None => None,
    };

    let file = std::fs::File::open(&raw).with_context(|| format!("cannot open '{}'", raw.display()))?;
    let results = read_raw_jsonl(std::io::BufReader::new(file))?;
    println!("  Loaded {} results from {}", results.len(), raw.display());
    println!();

    let experiment = match &config {
        Some(c) => c.name.clone(),
        None => experiment_from_raw_path(&raw, results.first().map(|r| r.target.as_str()))
            .unwrap_or_else(|| "aggregate".into()),
    };
    let formats = config
        .as_ref()
        .map(|c| c.report.formats.clone())
        .unwrap_or_else(|| vec![ReportFormat::Json, ReportFormat::Csv]);
    let writer = ReportWriter::new(super::resolve_output_dir(output_dir, config.as_ref()), &experiment);
    let registry = MetricRegistry::default();

    for (target, group) in by_target(results) {
        let records = aggregate_results(&group, &registry);
        super::print_records(&target, &records);
        for path in writer.write_reports(&records, &target, &formats)? {
            println!("  Wrote {}", path.display());
        }
        println!();
    }
    Ok(())
}

/// Recovers `<experiment>` from `<experiment>_<target>_<stamp>.raw.jsonl`.
///
/// The experiment name and the sanitised target may both contain `_`, so
/// the known target is stripped from the right when available.
fn experiment_from_raw_path(path: &Path, target: Option<&str>) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".raw.jsonl").or_else(|| name.strip_suffix(".jsonl")).unwrap_or(name);
    let (head, _stamp) = stem.rsplit_once('_')?;

    let experiment = match target.map(sanitize) {
        Some(t) => head.strip_suffix(t.as_str())?.strip_suffix('_')?,
        None => head.rsplit_once('_')?.0,
    };
    (!experiment.is_empty()).then(|| experiment.to_string())
}

/// Splits results by target, in first-seen order.
fn by_target(results: Vec<ExecutionResult>) -> Vec<(String, Vec<ExecutionResult>)> {
    let mut groups: Vec<(String, Vec<ExecutionResult>)> = Vec::new();
    for r in results {
        match groups.iter_mut().find(|(t, _)| *t == r.target) {
            Some((_, g)) => g.push(r),
            None => groups.push((r.target.clone(), vec![r])),
        }
    }
    groups
}
