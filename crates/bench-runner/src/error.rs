// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the run sequencer and experiment configuration.

/// Errors raised before or instead of running a batch.
///
/// Execution failures are never reported here; they are recorded in
/// [`crate::ExecutionResult`]s.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A spec or the matrix it came from is malformed.
    #[error("invalid benchmark spec: {0}")]
    InvalidSpec(#[from] bench_matrix::MatrixError),

    /// The run policy is unusable (e.g., zero repeats).
    #[error("invalid run policy: {0}")]
    InvalidPolicy(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
