// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Android Debug Bridge transport.
//!
//! Commands are relayed with `adb -s <serial> shell <command>`. Since
//! Android 7 the shell protocol forwards the remote exit code, so a failing
//! benchmark surfaces as a non-zero [`CommandOutput::exit_code`].

use crate::process;
use crate::{CommandOutput, ExecError, RemoteExecutor};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

/// Deadline for `adb devices`.
const LIST_TIMEOUT: Duration = Duration::from_secs(15);

/// Executes commands on Android devices through `adb shell`.
#[derive(Debug, Clone)]
pub struct AdbExecutor {
    binary: PathBuf,
}

impl Default for AdbExecutor {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("adb"),
        }
    }
}

/// One line of `adb devices` output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeviceEntry {
    /// Device serial (the `-s` argument).
    pub serial: String,
    /// Connection state: `device`, `offline`, `unauthorized`, ...
    pub state: String,
}

impl DeviceEntry {
    /// Returns `true` if the device accepts shell commands.
    pub fn is_online(&self) -> bool {
        self.state == "device"
    }
}

impl AdbExecutor {
    /// Uses a specific `adb` binary instead of the one on `PATH`.
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Builds the argument vector for one shell invocation.
    ///
    /// An empty target omits `-s`, letting adb pick its only device.
    pub fn shell_args(target: &str, command: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if !target.is_empty() {
            args.push("-s".to_string());
            args.push(target.to_string());
        }
        args.push("shell".to_string());
        args.push(command.to_string());
        args
    }

    /// Lists attached devices via `adb devices`.
    pub fn list_devices(&self) -> Result<Vec<DeviceEntry>, ExecError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("devices");
        let out = process::run(cmd, Some(LIST_TIMEOUT))?;
        if !out.success() {
            return Err(ExecError::UnexpectedOutput {
                command: "adb devices".into(),
                detail: format!("exit code {}: {}", out.exit_code, out.stderr.trim()),
            });
        }
        Ok(parse_devices(&out.stdout))
    }
}

impl RemoteExecutor for AdbExecutor {
    fn name(&self) -> &str {
        "adb"
    }

    fn execute(
        &self,
        target: &str,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError> {
        tracing::trace!("adb[{target}] $ {command}");
        let mut cmd = Command::new(&self.binary);
        cmd.args(Self::shell_args(target, command));
        process::run(cmd, timeout)
    }
}

/// Parses `adb devices` output.
///
/// ```text
/// List of devices attached
/// R58M1234ABC	device
/// emulator-5554	offline
/// ```
///
/// Daemon start-up chatter (`* daemon started successfully`) and blank lines
/// are skipped.
pub fn parse_devices(text: &str) -> Vec<DeviceEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?;
            let state = parts.next()?;
            Some(DeviceEntry {
                serial: serial.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}
