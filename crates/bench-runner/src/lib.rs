// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # bench-runner
//!
//! Turns an ordered list of [`BenchmarkSpec`]s into an ordered list of
//! [`ExecutionResult`]s by running each spec on one target through a
//! [`RemoteExecutor`].
//!
//! The [`RunSequencer`] owns every piece of timing policy in the system:
//!
//! - **repeats**: how many measured executions per spec.
//! - **cooldown**: idle time between consecutive executions, never before
//!   the first one of a batch.
//! - **timeout**: per-execution ceiling, enforced by the executor.
//! - **warmup**: one unrecorded, best-effort execution per model.
//!
//! Failures (non-zero exit, timeout, a relay that would not start) are
//! captured in the results as data. Only configuration errors are returned
//! as `Err`, and they are detected before the first command is sent.
//!
//! # Example
//! ```no_run
//! use bench_matrix::{expand, ModelRef, ParameterMatrix};
//! use bench_runner::{RunPolicy, RunSequencer, SequencerConfig};
//! use device_exec::AdbExecutor;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), bench_runner::RunnerError> {
//! let specs = expand(&ParameterMatrix::default(), &ModelRef::new("mnv2", "mnv2.xml"))?;
//! let config = SequencerConfig::new("R58M1234", "/data/local/tmp/devbench", "benchmark_app");
//! let mut sequencer = RunSequencer::new(Arc::new(AdbExecutor::default()), config)
//!     .on_progress(|done, total| println!("{done}/{total}"));
//! let policy = RunPolicy {
//!     repeats: 3,
//!     cooldown: Duration::from_secs(5),
//!     ..RunPolicy::default()
//! };
//! let results = sequencer.run_matrix(&specs, &policy)?;
//! assert_eq!(results.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! [`BenchmarkSpec`]: bench_matrix::BenchmarkSpec
//! [`RemoteExecutor`]: device_exec::RemoteExecutor

mod command;
pub mod config;
mod error;
mod policy;
mod result;
mod sequencer;

pub use command::CommandTemplate;
pub use config::{ExperimentConfig, ReportFormat};
pub use error::RunnerError;
pub use policy::RunPolicy;
pub use result::{ExecutionResult, FailureKind};
pub use sequencer::{RunSequencer, SequencerConfig, Sleeper, ThreadSleeper};
