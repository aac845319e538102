// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`RemoteExecutor`] trait and its output type.

use crate::ExecError;
use std::time::Duration;

/// Deadline for [`RemoteExecutor::is_reachable`].
const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(15);

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommandOutput {
    /// Process exit code. Signal deaths map to `128 + signal` on Unix.
    pub exit_code: i32,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` if the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs one shell command on one named target.
///
/// Implementations are synchronous: `execute` blocks the calling thread
/// until the command exits or `timeout` elapses. They must not retry.
pub trait RemoteExecutor: Send + Sync {
    /// Short transport name for logs (`"adb"`, `"ssh"`, `"local"`).
    fn name(&self) -> &str;

    /// Executes `command` on `target`.
    ///
    /// Returns `Ok` for any command that ran to completion, whatever its exit
    /// code. Returns [`ExecError::Timeout`] if `timeout` expired first.
    fn execute(
        &self,
        target: &str,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError>;

    /// Cheap reachability check: runs `echo ok` on the target.
    fn is_reachable(&self, target: &str) -> bool {
        match self.execute(target, "echo ok", Some(REACHABILITY_TIMEOUT)) {
            Ok(out) => out.success() && out.stdout.trim() == "ok",
            Err(e) => {
                tracing::debug!("reachability check of '{target}' via {} failed: {e}", self.name());
                false
            }
        }
    }
}
