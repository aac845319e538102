// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SSH transport for single-board computers and Linux boxes.
//!
//! `BatchMode=yes` makes ssh fail instead of prompting, so an unattended
//! run never hangs on a password or host-key question.
//!
//! A timeout kills the local `ssh` client only. Without a tty the remote
//! shell gets no hangup, so the remote command keeps running until it exits
//! on its own; a generous cooldown is the only guard against it overlapping
//! the next run.

use crate::process;
use crate::{CommandOutput, ExecError, RemoteExecutor};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

/// Exit status ssh itself uses for connection-level failures.
const SSH_TRANSPORT_FAILURE: i32 = 255;

/// Executes commands on a host over `ssh`.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    /// ssh binary.
    pub binary: PathBuf,
    /// Login user; `None` uses the ssh config or the local user.
    pub user: Option<String>,
    /// Port; `None` uses the ssh config or 22.
    pub port: Option<u16>,
    /// Private key passed with `-i`.
    pub identity: Option<PathBuf>,
    /// `ConnectTimeout` in seconds.
    pub connect_timeout_secs: u32,
}

impl Default for SshExecutor {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ssh"),
            user: None,
            port: None,
            identity: None,
            connect_timeout_secs: 10,
        }
    }
}

impl SshExecutor {
    /// Builds the ssh argument vector for `command` on `host`.
    pub fn ssh_args(&self, host: &str, command: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout_secs),
        ];
        if let Some(port) = self.port {
            args.push("-p".into());
            args.push(port.to_string());
        }
        if let Some(identity) = &self.identity {
            args.push("-i".into());
            args.push(identity.display().to_string());
        }
        let destination = match &self.user {
            Some(user) => format!("{user}@{host}"),
            None => host.to_string(),
        };
        args.push(destination);
        args.push(command.to_string());
        args
    }
}

impl RemoteExecutor for SshExecutor {
    fn name(&self) -> &str {
        "ssh"
    }

    fn execute(
        &self,
        target: &str,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError> {
        tracing::trace!("ssh[{target}] $ {command}");
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.ssh_args(target, command));
        let out = process::run(cmd, timeout)?;
        if out.exit_code == SSH_TRANSPORT_FAILURE {
            tracing::warn!(
                "ssh to '{target}' exited with 255 (connection failure?): {}",
                out.stderr.trim(),
            );
        }
        Ok(out)
    }
}
