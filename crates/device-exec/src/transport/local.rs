// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Host-local transport: `sh -c <command>`.
//!
//! Used for benchmarking the host itself, for dry runs, and in tests. The
//! target id is only carried through to logs.

use crate::process;
use crate::{CommandOutput, ExecError, RemoteExecutor};
use std::process::Command;
use std::time::Duration;

/// Executes commands in a local shell.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    shell: String,
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self { shell: "sh".into() }
    }
}

impl LocalExecutor {
    /// Uses a different POSIX shell (e.g., `bash`).
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl RemoteExecutor for LocalExecutor {
    fn name(&self) -> &str {
        "local"
    }

    fn execute(
        &self,
        target: &str,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError> {
        tracing::trace!("local[{target}] $ {command}");
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);
        process::run(cmd, timeout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_echo() {
        let out = LocalExecutor::default()
            .execute("host", "echo Throughput: 10.5 FPS", Some(Duration::from_secs(5)))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "Throughput: 10.5 FPS");
    }

    #[test]
    fn test_exit_code_forwarded() {
        let out = LocalExecutor::default()
            .execute("host", "exit 7", None)
            .unwrap();
        assert_eq!(out.exit_code, 7);
    }

    #[test]
    fn test_timeout_is_distinct() {
        let err = LocalExecutor::default()
            .execute("host", "exec sleep 5", Some(Duration::from_millis(200)))
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_is_reachable() {
        assert!(LocalExecutor::default().is_reachable("host"));
        assert!(!LocalExecutor::with_shell("/nonexistent/sh").is_reachable("host"));
    }
}
