// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # bench-report
//!
//! Turns raw [`ExecutionResult`]s into numbers and tables.
//!
//! ```text
//! ExecutionResult.stdout ──parse──▶ ParsedMetrics ──┐
//!                                                    ├─▶ SampleRecord ──aggregate──▶ AggregatedRecord
//! ExecutionResult.spec/failure ─────────────────────┘                                 │
//!                                                                        JSON / CSV ◀─┘
//! ```
//!
//! Parsing and aggregation are pure functions. The sinks are the only part
//! of the crate that touches the filesystem.
//!
//! [`ExecutionResult`]: bench_runner::ExecutionResult

mod aggregate;
mod error;
pub mod parser;
pub mod sink;

pub use aggregate::{aggregate, aggregate_results, AggregatedRecord, MetricStats, SampleRecord};
pub use error::ReportError;
pub use parser::{parse, MetricKind, MetricPattern, MetricRegistry, MetricValue, ParsedMetrics};
pub use sink::{ReportStatus, ReportWriter};
