// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end: scripted executions → raw JSONL → parse → aggregate → files.

use bench_matrix::{expand, ModelRef, ParameterMatrix};
use bench_report::sink::{read_raw_jsonl, write_raw_jsonl};
use bench_report::{aggregate_results, MetricRegistry, ReportStatus, ReportWriter};
use bench_runner::{ReportFormat, RunPolicy, RunSequencer, SequencerConfig};
use device_exec::{CommandOutput, ExecError, RemoteExecutor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Reports a throughput that grows by 10 FPS per call; every fourth call fails.
struct Bench {
    calls: AtomicUsize,
}

impl RemoteExecutor for Bench {
    fn name(&self) -> &str {
        "bench"
    }

    fn execute(&self, _: &str, _: &str, _: Option<Duration>) -> Result<CommandOutput, ExecError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n % 4 == 3 {
            return Ok(CommandOutput {
                exit_code: 1,
                stdout: "[ ERROR ] Device not available\n".into(),
                stderr: "Aborted".into(),
            });
        }
        Ok(CommandOutput {
            exit_code: 0,
            stdout: format!(
                "[ INFO ] Count:            {} iterations\n\
                 [ INFO ] Latency:\n\
                 [ INFO ]    Median:        {:.2} ms\n\
                 [ INFO ] Throughput:   {:.2} FPS\n",
                100 + n,
                10.0 + n as f64,
                100.0 + 10.0 * n as f64
            ),
            stderr: String::new(),
        })
    }
}

fn run_batch() -> Vec<bench_runner::ExecutionResult> {
    let matrix = ParameterMatrix {
        nthreads: vec![1, 2],
        ..Default::default()
    };
    let specs = expand(&matrix, &ModelRef::new("mnv2", "models/mnv2.xml")).unwrap();
    let mut seq = RunSequencer::new(
        Arc::new(Bench {
            calls: AtomicUsize::new(0),
        }),
        SequencerConfig::new("dev0", "/data/local/tmp/devbench", "benchmark_app"),
    );
    let policy = RunPolicy {
        repeats: 3,
        ..Default::default()
    };
    seq.run_matrix(&specs, &policy).unwrap()
}

// ── Aggregation ───────────────────────────────────────────────

#[test]
fn test_aggregate_batch() {
    let results = run_batch();
    assert_eq!(results.len(), 6);

    let records = aggregate_results(&results, &MetricRegistry::default());
    assert_eq!(records.len(), 2);

    // Calls 0,1,2 → nthreads=1, all succeed: 100, 110, 120 FPS.
    let first = &records[0];
    assert_eq!(first.spec.nthreads, 1);
    assert_eq!((first.repeats, first.successes), (3, 3));
    let t = first.metric("throughput").unwrap();
    assert_eq!((t.min, t.median, t.max), (100.0, 110.0, 120.0));

    // Calls 3,4,5 → nthreads=2, call 3 fails: 140, 150 FPS.
    let second = &records[1];
    assert_eq!((second.repeats, second.successes), (3, 2));
    let t = second.metric("throughput").unwrap();
    assert_eq!(t.count, 2);
    assert_eq!(t.median, 150.0);
    assert!((t.mean - 145.0).abs() < 1e-9);
    assert_eq!(second.metric("iterations").unwrap().min, 104.0);

    assert_eq!(
        ReportStatus::evaluate(&records, results.len()),
        ReportStatus::Partial {
            successes: 5,
            expected: 6
        }
    );
}

// ── Sinks ─────────────────────────────────────────────────────

#[test]
fn test_raw_jsonl_reaggregates_identically() {
    let results = run_batch();
    let mut buf = Vec::new();
    write_raw_jsonl(&results, &mut buf).unwrap();
    let back = read_raw_jsonl(buf.as_slice()).unwrap();
    assert_eq!(back, results);

    let registry = MetricRegistry::default();
    assert_eq!(
        aggregate_results(&back, &registry),
        aggregate_results(&results, &registry)
    );
}

#[test]
fn test_report_writer_creates_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/results");
    let results = run_batch();
    let records = aggregate_results(&results, &MetricRegistry::default());

    let writer = ReportWriter::new(&out, "mnv2-sweep").with_stamp("20250101-000000");
    let paths = writer
        .write_reports(&records, "dev0", &[ReportFormat::Json, ReportFormat::Csv])
        .unwrap();
    let raw = writer.write_raw(&results, "dev0").unwrap();

    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("mnv2-sweep_dev0_20250101-000000.json"));
    assert!(paths[1].ends_with("mnv2-sweep_dev0_20250101-000000.csv"));
    assert!(raw.ends_with("mnv2-sweep_dev0_20250101-000000.raw.jsonl"));

    let csv = std::fs::read_to_string(&paths[1]).unwrap();
    let header = csv.lines().next().unwrap();
    assert!(header.starts_with("model,model_path,device,"));
    assert!(header.contains("iterations_mean"));
    assert!(header.contains("latency_median_max"));
    assert!(header.ends_with("throughput_max,repeats,successes"));
    assert_eq!(csv.lines().count(), 3);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths[0]).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);

    let raw_lines = std::fs::read_to_string(&raw).unwrap();
    assert_eq!(raw_lines.lines().count(), 6);
}
