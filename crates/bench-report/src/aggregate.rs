// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reduction of repeated samples into per-configuration statistics.
//!
//! Samples are grouped by [`BenchmarkSpec::config_key`]. Groups come out in
//! the order their first sample went in. Within a group, each metric is
//! summarised over the successful samples that reported it:
//!
//! ```text
//! samples:   ok{tput=100}  ok{tput=110}  failed{}  ok{tput=105}
//! group:     repeats=4  successes=3
//! tput:      mean=105  median=105  min=100  max=110
//! ```
//!
//! Failed samples count towards `repeats` but never contribute numbers.
//! A metric with no values in a group is left out of that group entirely.
//! For an even number of values the median is the upper-middle element.

use crate::{MetricRegistry, ParsedMetrics};
use bench_matrix::BenchmarkSpec;
use bench_runner::{ExecutionResult, FailureKind};
use std::collections::{BTreeMap, HashMap};

/// One execution reduced to what aggregation needs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SampleRecord {
    pub spec: BenchmarkSpec,
    pub exit_code: Option<i32>,
    pub failure: Option<FailureKind>,
    pub metrics: ParsedMetrics,
}

impl SampleRecord {
    /// Parses `result.stdout` with `registry`.
    pub fn from_result(result: &ExecutionResult, registry: &MetricRegistry) -> Self {
        Self {
            spec: result.spec.clone(),
            exit_code: result.exit_code,
            failure: result.failure,
            metrics: registry.parse(&result.stdout),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Summary statistics of one metric within one configuration.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Number of samples the statistics were computed from.
    pub count: usize,
}

impl MetricStats {
    /// Computes statistics over `values`. Returns `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        Some(Self {
            mean: sorted.iter().sum::<f64>() / n as f64,
            median: sorted[n / 2],
            min: sorted[0],
            max: sorted[n - 1],
            count: n,
        })
    }
}

/// Aggregate for one configuration key.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AggregatedRecord {
    pub spec: BenchmarkSpec,
    /// Samples in the group, failed ones included.
    pub repeats: usize,
    /// Samples with no failure.
    pub successes: usize,
    /// Per-metric statistics, only for metrics seen in at least one success.
    pub metrics: BTreeMap<String, MetricStats>,
}

impl AggregatedRecord {
    pub fn metric(&self, name: &str) -> Option<&MetricStats> {
        self.metrics.get(name)
    }

    pub fn failures(&self) -> usize {
        self.repeats - self.successes
    }
}

/// Groups samples by configuration and summarises each metric.
pub fn aggregate(samples: &[SampleRecord]) -> Vec<AggregatedRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&SampleRecord>> = Vec::new();

    for sample in samples {
        let slot = *index.entry(sample.spec.config_key()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(sample);
    }

    let records: Vec<AggregatedRecord> = groups.into_iter().map(|g| reduce(&g)).collect();
    tracing::debug!(
        "aggregated {} samples into {} configurations",
        samples.len(),
        records.len()
    );
    records
}

/// Parses and aggregates raw execution results in one step.
pub fn aggregate_results(results: &[ExecutionResult], registry: &MetricRegistry) -> Vec<AggregatedRecord> {
    let samples: Vec<SampleRecord> = results
        .iter()
        .map(|r| SampleRecord::from_result(r, registry))
        .collect();
    aggregate(&samples)
}

fn reduce(group: &[&SampleRecord]) -> AggregatedRecord {
    let mut values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut successes = 0;
    for sample in group.iter().filter(|s| s.is_success()) {
        successes += 1;
        for (name, value) in &sample.metrics {
            values.entry(name.as_str()).or_default().push(value.as_f64());
        }
    }

    let metrics = values
        .into_iter()
        .filter_map(|(name, v)| MetricStats::from_values(&v).map(|s| (name.to_string(), s)))
        .collect();

    AggregatedRecord {
        spec: group[0].spec.clone(),
        repeats: group.len(),
        successes,
        metrics,
    }
}
