// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Raw per-execution records.

use bench_matrix::BenchmarkSpec;
use std::time::Duration;

/// Why an execution did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The command ran and exited non-zero.
    NonZeroExit,
    /// The deadline expired and the command was killed.
    Timeout,
    /// The relay itself failed (could not spawn `adb`/`ssh`, pipe error).
    Transport,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonZeroExit => "non_zero_exit",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of running one spec exactly once.
///
/// Created by the sequencer and never modified afterwards.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionResult {
    /// The spec that was executed.
    pub spec: BenchmarkSpec,
    /// Target the command ran on.
    pub target: String,
    /// The literal command string sent to the executor.
    pub command: String,
    /// Exit code, absent on timeout or transport failure.
    pub exit_code: Option<i32>,
    /// Failure classification, `None` on success.
    pub failure: Option<FailureKind>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Wall-clock duration as seen by the host.
    pub duration: Duration,
    /// Unix timestamp in milliseconds when the execution finished.
    pub finished_at_ms: u64,
    /// Zero-based repeat index.
    pub repeat: u32,
}

impl ExecutionResult {
    /// Returns `true` if the command exited 0.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// One-line status for logs: `"ok 12.3s"`, `"timeout"`, `"exit 134"`.
    pub fn status_label(&self) -> String {
        match (self.failure, self.exit_code) {
            (None, _) => format!("ok {:.1}s", self.duration.as_secs_f64()),
            (Some(FailureKind::NonZeroExit), Some(code)) => format!("exit {code}"),
            (Some(kind), _) => kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_matrix::{expand, ModelRef, ParameterMatrix};

    fn result(exit_code: Option<i32>, failure: Option<FailureKind>) -> ExecutionResult {
        let spec = expand(&ParameterMatrix::default(), &ModelRef::new("m", "m.xml"))
            .unwrap()
            .remove(0);
        ExecutionResult {
            spec,
            target: "dev".into(),
            command: "./benchmark_app".into(),
            exit_code,
            failure,
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::from_millis(1500),
            finished_at_ms: 1_700_000_000_000,
            repeat: 0,
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(result(Some(0), None).status_label(), "ok 1.5s");
        assert_eq!(
            result(Some(134), Some(FailureKind::NonZeroExit)).status_label(),
            "exit 134"
        );
        assert_eq!(
            result(None, Some(FailureKind::Timeout)).status_label(),
            "timeout"
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let r = result(None, Some(FailureKind::Transport));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"failure\":\"transport\""));
        let back: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert!(!back.is_success());
    }
}
