// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Report output: JSON, CSV, raw JSON Lines, and the overall batch status.
//!
//! Aggregated records are flattened to one row each:
//!
//! ```text
//! model,model_path,device,api,niter,nireq,nstreams,nthreads,precision,hint,
//!     <metric>_mean,<metric>_median,<metric>_min,<metric>_max,   (per metric, by name)
//!     repeats,successes
//! ```
//!
//! The metric columns are the union over the batch. A record lacking a
//! metric leaves those CSV cells empty and omits those JSON keys.

use crate::{AggregatedRecord, ReportError};
use bench_matrix::BenchmarkSpec;
use bench_runner::{ExecutionResult, ReportFormat};
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const STAT_SUFFIXES: [&str; 4] = ["mean", "median", "min", "max"];

/// Sorted union of metric names across `records`.
pub fn metric_names(records: &[AggregatedRecord]) -> Vec<String> {
    let names: BTreeSet<&String> = records.iter().flat_map(|r| r.metrics.keys()).collect();
    names.into_iter().cloned().collect()
}

/// Column names for a CSV report of `records`.
pub fn csv_header(records: &[AggregatedRecord]) -> Vec<String> {
    let mut header: Vec<String> = BenchmarkSpec::FIELD_NAMES.iter().map(|s| s.to_string()).collect();
    for name in metric_names(records) {
        header.extend(STAT_SUFFIXES.iter().map(|suffix| format!("{name}_{suffix}")));
    }
    header.push("repeats".into());
    header.push("successes".into());
    header
}

/// Writes `records` as CSV.
pub fn write_csv<W: Write>(records: &[AggregatedRecord], writer: W) -> Result<(), ReportError> {
    let metrics = metric_names(records);
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(csv_header(records))?;

    for record in records {
        let mut row: Vec<String> = record.spec.field_values().to_vec();
        for name in &metrics {
            match record.metric(name) {
                Some(s) => row.extend([s.mean, s.median, s.min, s.max].iter().map(|v| v.to_string())),
                None => row.extend(std::iter::repeat(String::new()).take(STAT_SUFFIXES.len())),
            }
        }
        row.push(record.repeats.to_string());
        row.push(record.successes.to_string());
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Flattens one record into a JSON object with the CSV column names as keys.
pub fn flatten(record: &AggregatedRecord) -> serde_json::Map<String, serde_json::Value> {
    use serde_json::Value;

    let mut obj = serde_json::Map::new();
    let spec = &record.spec;
    obj.insert("model".into(), Value::from(spec.model.as_str()));
    obj.insert("model_path".into(), Value::from(spec.model_path.as_str()));
    obj.insert("device".into(), Value::from(spec.device.as_str()));
    obj.insert("api".into(), Value::from(spec.api.as_str()));
    obj.insert("niter".into(), Value::from(spec.niter));
    obj.insert("nireq".into(), Value::from(spec.nireq));
    obj.insert("nstreams".into(), Value::from(spec.nstreams));
    obj.insert("nthreads".into(), Value::from(spec.nthreads));
    obj.insert("precision".into(), Value::from(spec.precision.as_str()));
    obj.insert(
        "hint".into(),
        spec.hint.map(|h| Value::from(h.as_str())).unwrap_or(Value::Null),
    );

    for (name, s) in &record.metrics {
        for (suffix, value) in STAT_SUFFIXES.iter().zip([s.mean, s.median, s.min, s.max]) {
            obj.insert(format!("{name}_{suffix}"), Value::from(value));
        }
    }
    obj.insert("repeats".into(), Value::from(record.repeats));
    obj.insert("successes".into(), Value::from(record.successes));
    obj
}

/// Writes `records` as a pretty-printed JSON array of flat objects.
pub fn write_json<W: Write>(records: &[AggregatedRecord], mut writer: W) -> Result<(), ReportError> {
    let rows: Vec<serde_json::Value> = records
        .iter()
        .map(|r| serde_json::Value::Object(flatten(r)))
        .collect();
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes one JSON object per result, one per line.
pub fn write_raw_jsonl<W: Write>(results: &[ExecutionResult], mut writer: W) -> Result<(), ReportError> {
    for result in results {
        serde_json::to_writer(&mut writer, result)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads results written by [`write_raw_jsonl`]. Blank lines are skipped.
pub fn read_raw_jsonl<R: BufRead>(reader: R) -> Result<Vec<ExecutionResult>, ReportError> {
    let mut results = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let result = serde_json::from_str(&line)
            .map_err(|source| ReportError::RawRecord { line: i + 1, source })?;
        results.push(result);
    }
    Ok(results)
}

/// Writes report files for one experiment into one directory.
///
/// File names are `<experiment>_<target>_<YYYYmmdd-HHMMSS>.<ext>`; the
/// timestamp is fixed when the writer is created so every file of one
/// batch shares it.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: String,
    stamp: String,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, experiment: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            experiment: sanitize(experiment),
            stamp: chrono::Local::now().format("%Y%m%d-%H%M%S").to_string(),
        }
    }

    /// Overrides the timestamp component of file names.
    pub fn with_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = stamp.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path for a report of `target` with extension `ext`.
    pub fn path_for(&self, target: &str, ext: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}_{}.{ext}",
            self.experiment,
            sanitize(target),
            self.stamp
        ))
    }

    /// Writes aggregated records in every requested format.
    pub fn write_reports(
        &self,
        records: &[AggregatedRecord],
        target: &str,
        formats: &[ReportFormat],
    ) -> Result<Vec<PathBuf>, ReportError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let mut written = Vec::with_capacity(formats.len());
        for format in formats {
            let path = self.path_for(target, format.extension());
            let file = std::io::BufWriter::new(std::fs::File::create(&path)?);
            match format {
                ReportFormat::Json => write_json(records, file)?,
                ReportFormat::Csv => write_csv(records, file)?,
            }
            tracing::info!("wrote {} report: {}", format.extension(), path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Writes every raw result as JSON Lines.
    pub fn write_raw(&self, results: &[ExecutionResult], target: &str) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(target, "raw.jsonl");
        let file = std::io::BufWriter::new(std::fs::File::create(&path)?);
        write_raw_jsonl(results, file)?;
        tracing::info!("wrote {} raw results: {}", results.len(), path.display());
        Ok(path)
    }
}

/// Keeps file-name-safe characters, replacing the rest with `_`.
pub fn sanitize(s: &str) -> String {
    let out: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || "-_.".contains(c) { c } else { '_' })
        .collect();
    if out.is_empty() {
        "unnamed".into()
    } else {
        out
    }
}

/// Outcome of a batch, used for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// Every expected execution succeeded.
    Complete { successes: usize },
    /// Some executions failed.
    Partial { successes: usize, expected: usize },
    /// Nothing succeeded.
    NoSuccess { expected: usize },
}

impl ReportStatus {
    /// Compares successes across `records` with `expected` executions.
    pub fn evaluate(records: &[AggregatedRecord], expected: usize) -> Self {
        let successes: usize = records.iter().map(|r| r.successes).sum();
        if successes == 0 {
            Self::NoSuccess { expected }
        } else if successes < expected {
            Self::Partial { successes, expected }
        } else {
            Self::Complete { successes }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Process exit code: 0 complete, 2 partial, 1 nothing succeeded.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Complete { .. } => 0,
            Self::Partial { .. } => 2,
            Self::NoSuccess { .. } => 1,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete { successes } => write!(f, "complete ({successes} runs succeeded)"),
            Self::Partial { successes, expected } => {
                write!(f, "partial ({successes}/{expected} runs succeeded)")
            }
            Self::NoSuccess { expected } => write!(f, "failed (0/{expected} runs succeeded)"),
        }
    }
}
