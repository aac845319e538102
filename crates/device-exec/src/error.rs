// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for command execution.

use std::time::Duration;

/// Errors that can occur when executing a command on a target.
///
/// An ordinary non-zero exit is not represented here; see
/// [`crate::CommandOutput::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The command did not finish before its deadline and was killed.
    #[error("command timed out after {:.1}s", .after.as_secs_f64())]
    Timeout {
        after: Duration,
        /// Output captured before the deadline.
        stdout: String,
        stderr: String,
    },

    /// The relay binary (`adb`, `ssh`, `sh`) could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Waiting on or reading from the child process failed.
    #[error("I/O error while running command: {0}")]
    Io(#[from] std::io::Error),

    /// A helper command ran but printed something we could not interpret.
    #[error("unexpected output from '{command}': {detail}")]
    UnexpectedOutput { command: String, detail: String },
}

impl ExecError {
    /// Returns `true` if the deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
