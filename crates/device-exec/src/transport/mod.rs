// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Concrete transports and the configuration that selects one.
//!
//! # TOML Format
//! ```toml
//! kind = "ssh"                 # adb | ssh | local
//! targets = ["rpi4.lan", "orangepi5.lan"]
//! user = "bench"               # ssh only
//! port = 2222                  # ssh only
//! identity = "~/.ssh/bench"    # ssh only
//! adb_path = "/opt/sdk/platform-tools/adb"   # adb only
//! ```

pub mod adb;
pub mod local;
pub mod ssh;

use crate::RemoteExecutor;
use adb::AdbExecutor;
use local::LocalExecutor;
use ssh::SshExecutor;
use std::path::PathBuf;
use std::sync::Arc;

/// Which relay carries commands to the targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Adb,
    Ssh,
    Local,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adb => "adb",
            Self::Ssh => "ssh",
            Self::Local => "local",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport selection plus per-transport options.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TransportConfig {
    /// Relay kind.
    pub kind: TransportKind,
    /// Target ids: ADB serials, SSH hosts, or a single label for `local`.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Path to the `adb` binary (defaults to `adb` on `PATH`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adb_path: Option<PathBuf>,
    /// SSH login user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// SSH port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// SSH private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<PathBuf>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::Local,
            targets: vec!["localhost".into()],
            adb_path: None,
            user: None,
            port: None,
            identity: None,
        }
    }
}

impl TransportConfig {
    /// Builds the executor described by this config.
    pub fn create_executor(&self) -> Arc<dyn RemoteExecutor> {
        match self.kind {
            TransportKind::Adb => {
                let adb = match &self.adb_path {
                    Some(path) => AdbExecutor::with_binary(path.clone()),
                    None => AdbExecutor::default(),
                };
                Arc::new(adb)
            }
            TransportKind::Ssh => {
                let mut ssh = SshExecutor::default();
                ssh.user = self.user.clone();
                ssh.port = self.port;
                ssh.identity = self.identity.clone();
                Arc::new(ssh)
            }
            TransportKind::Local => Arc::new(LocalExecutor::default()),
        }
    }

    /// Targets to run against. `local` always yields exactly one.
    pub fn resolved_targets(&self) -> Vec<String> {
        match (self.kind, self.targets.is_empty()) {
            (TransportKind::Local, true) => vec!["localhost".into()],
            _ => self.targets.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_executor_names() {
        for (kind, name) in [
            (TransportKind::Adb, "adb"),
            (TransportKind::Ssh, "ssh"),
            (TransportKind::Local, "local"),
        ] {
            let cfg = TransportConfig {
                kind,
                ..Default::default()
            };
            assert_eq!(cfg.create_executor().name(), name);
        }
    }

    #[test]
    fn test_from_toml_ssh() {
        let cfg: TransportConfig = toml::from_str(
            r#"
kind = "ssh"
targets = ["rpi4.lan"]
user = "bench"
port = 2222
"#,
        )
        .unwrap();
        assert_eq!(cfg.kind, TransportKind::Ssh);
        assert_eq!(cfg.targets, vec!["rpi4.lan".to_string()]);
        assert_eq!(cfg.user.as_deref(), Some("bench"));
        assert_eq!(cfg.port, Some(2222));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let res: Result<TransportConfig, _> = toml::from_str("kind = \"telnet\"");
        assert!(res.is_err());
    }

    #[test]
    fn test_local_targets_default() {
        let cfg = TransportConfig {
            kind: TransportKind::Local,
            targets: vec![],
            ..Default::default()
        };
        assert_eq!(cfg.resolved_targets(), vec!["localhost".to_string()]);

        let adb = TransportConfig {
            kind: TransportKind::Adb,
            targets: vec![],
            ..Default::default()
        };
        assert!(adb.resolved_targets().is_empty());
    }
}
