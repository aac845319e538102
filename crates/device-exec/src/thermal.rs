// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Remote SoC temperature via `/sys/class/thermal/`.
//!
//! Both Android and Linux SBC kernels expose thermal zone 0 as millidegrees
//! Celsius. Reading it through the executor lets an operator confirm that a
//! cooldown actually brought the device back to a steady state.

use crate::{ExecError, RemoteExecutor};
use std::time::Duration;

/// Temperature at which most mobile SoCs start frequency throttling (°C).
const THROTTLE_THRESHOLD_C: f32 = 80.0;

/// Default sysfs path for the SoC thermal zone.
pub const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Thermal state of a target.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ThermalInfo {
    /// SoC temperature in degrees Celsius.
    pub cpu_temp_celsius: f32,
}

impl ThermalInfo {
    /// Reads thermal zone 0 on `target`.
    pub fn read_remote(executor: &dyn RemoteExecutor, target: &str) -> Result<Self, ExecError> {
        Self::read_remote_from(executor, target, THERMAL_ZONE_PATH)
    }

    /// Reads a specific thermal zone file on `target`.
    pub fn read_remote_from(
        executor: &dyn RemoteExecutor,
        target: &str,
        path: &str,
    ) -> Result<Self, ExecError> {
        let command = format!("cat {path}");
        let out = executor.execute(target, &command, Some(READ_TIMEOUT))?;
        if !out.success() {
            return Err(ExecError::UnexpectedOutput {
                command,
                detail: format!("exit code {}: {}", out.exit_code, out.stderr.trim()),
            });
        }
        Self::parse_millidegrees(&out.stdout).ok_or_else(|| ExecError::UnexpectedOutput {
            command,
            detail: format!("expected integer millidegrees, got '{}'", out.stdout.trim()),
        })
    }

    /// Parses kernel output such as `"54321\n"` (54.321 °C).
    pub fn parse_millidegrees(text: &str) -> Option<Self> {
        let millidegrees: i64 = text.trim().parse().ok()?;
        Some(Self {
            cpu_temp_celsius: millidegrees as f32 / 1000.0,
        })
    }

    /// Returns `true` at or above the throttling threshold.
    pub fn is_overheating(&self) -> bool {
        self.cpu_temp_celsius >= THROTTLE_THRESHOLD_C
    }

    /// Degrees left before throttling. Negative when already throttling.
    pub fn headroom_celsius(&self) -> f32 {
        THROTTLE_THRESHOLD_C - self.cpu_temp_celsius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandOutput;

    struct Cat {
        code: i32,
        stdout: &'static str,
    }

    impl RemoteExecutor for Cat {
        fn name(&self) -> &str {
            "cat"
        }

        fn execute(&self, _: &str, command: &str, _: Option<Duration>) -> Result<CommandOutput, ExecError> {
            assert!(command.starts_with("cat /sys/class/thermal/"));
            Ok(CommandOutput {
                exit_code: self.code,
                stdout: self.stdout.into(),
                stderr: "No such file or directory".into(),
            })
        }
    }

    #[test]
    fn test_parse_millidegrees() {
        let info = ThermalInfo::parse_millidegrees("54321\n").unwrap();
        assert!((info.cpu_temp_celsius - 54.321).abs() < 0.001);
        assert!(ThermalInfo::parse_millidegrees("warm").is_none());
    }

    #[test]
    fn test_read_remote() {
        let exec = Cat {
            code: 0,
            stdout: "41000\n",
        };
        let info = ThermalInfo::read_remote(&exec, "dev").unwrap();
        assert!((info.cpu_temp_celsius - 41.0).abs() < 0.001);
    }

    #[test]
    fn test_read_remote_missing_zone() {
        let exec = Cat { code: 1, stdout: "" };
        let err = ThermalInfo::read_remote(&exec, "dev").unwrap_err();
        assert!(matches!(err, ExecError::UnexpectedOutput { .. }));
    }

    #[test]
    fn test_overheating_and_headroom() {
        let cool = ThermalInfo {
            cpu_temp_celsius: 65.0,
        };
        assert!(!cool.is_overheating());
        assert!((cool.headroom_celsius() - 15.0).abs() < 0.001);

        let hot = ThermalInfo {
            cpu_temp_celsius: 85.0,
        };
        assert!(hot.is_overheating());
        assert!(hot.headroom_celsius() < 0.0);
    }
}
