// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Experiment description loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! name = "mobilenet-sweep"
//!
//! [runtime]
//! remote_dir = "/data/local/tmp/devbench"
//! executable = "benchmark_app"
//!
//! [transport]
//! kind = "adb"
//! targets = ["R58M1234"]
//!
//! [policy]
//! repeats = 3
//! cooldown_secs = 5.0
//! timeout_secs = 600.0
//! warmup = true
//!
//! [matrix]
//! device = ["CPU"]
//! nthreads = [1, 2, 4]
//!
//! [[models]]
//! name = "mobilenet_v2"
//! path = "models/mobilenet_v2.xml"
//!
//! [report]
//! output_dir = "results"
//! formats = ["json", "csv"]
//! ```

use crate::{RunPolicy, RunnerError, SequencerConfig};
use bench_matrix::{ModelRef, ParameterMatrix};
use device_exec::{TransportConfig, TransportKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A complete experiment: what to run, where, and how often.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExperimentConfig {
    /// Experiment name, used to name report files.
    pub name: String,
    /// Benchmark executable location on the targets.
    #[serde(default)]
    pub runtime: RuntimeSection,
    /// Relay and target list.
    #[serde(default)]
    pub transport: TransportConfig,
    /// Repeat/cooldown/timeout/warmup policy.
    #[serde(default)]
    pub policy: PolicySection,
    /// Parameter axes.
    #[serde(default)]
    pub matrix: ParameterMatrix,
    /// Models to benchmark, in run order.
    pub models: Vec<ModelRef>,
    /// Report output.
    #[serde(default)]
    pub report: ReportSection,
}

/// Where the benchmark binary lives on the target.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RuntimeSection {
    /// Remote working directory holding the executable, its libraries and models.
    #[serde(default = "default_remote_dir")]
    pub remote_dir: String,
    /// Executable name relative to `remote_dir`, or an absolute path.
    #[serde(default = "default_executable")]
    pub executable: String,
}

fn default_remote_dir() -> String {
    "/data/local/tmp/devbench".to_string()
}

fn default_executable() -> String {
    "benchmark_app".to_string()
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            remote_dir: default_remote_dir(),
            executable: default_executable(),
        }
    }
}

/// Run policy as written in TOML (durations in seconds).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PolicySection {
    #[serde(default = "default_repeats")]
    pub repeats: u32,
    #[serde(default)]
    pub cooldown_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
    #[serde(default)]
    pub warmup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_iterations: Option<u32>,
}

fn default_repeats() -> u32 {
    1
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
            cooldown_secs: 0.0,
            timeout_secs: None,
            warmup: false,
            warmup_iterations: None,
        }
    }
}

/// Output formats for aggregated reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Where reports go.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_formats")]
    pub formats: Vec<ReportFormat>,
    /// Also write every raw execution result as JSON Lines.
    #[serde(default = "default_true")]
    pub save_raw: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_formats() -> Vec<ReportFormat> {
    vec![ReportFormat::Json, ReportFormat::Csv]
}

fn default_true() -> bool {
    true
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            formats: default_formats(),
            save_raw: true,
        }
    }
}

impl ExperimentConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RunnerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RunnerError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RunnerError> {
        toml::from_str(toml_str)
            .map_err(|e| RunnerError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RunnerError> {
        toml::to_string_pretty(self)
            .map_err(|e| RunnerError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks everything that can be checked without touching a device.
    ///
    /// - At least one model, each with a name and a path, no duplicate names.
    /// - A valid matrix and policy.
    /// - At least one target for `adb` and `ssh` transports.
    /// - A non-empty executable and remote directory.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.models.is_empty() {
            return Err(RunnerError::ConfigError("no models listed".into()));
        }
        let mut names = std::collections::HashSet::new();
        for model in &self.models {
            model.validate()?;
            if !names.insert(model.name.as_str()) {
                return Err(RunnerError::ConfigError(format!(
                    "model '{}' is listed more than once",
                    model.name
                )));
            }
        }

        self.matrix.validate()?;
        self.run_policy()?.validate()?;

        if self.transport.kind != TransportKind::Local && self.transport.targets.is_empty() {
            return Err(RunnerError::ConfigError(format!(
                "transport '{}' needs at least one target",
                self.transport.kind
            )));
        }
        if self.runtime.executable.trim().is_empty() {
            return Err(RunnerError::ConfigError("runtime.executable is empty".into()));
        }
        if self.runtime.remote_dir.trim().is_empty() {
            return Err(RunnerError::ConfigError("runtime.remote_dir is empty".into()));
        }
        if self.report.formats.is_empty() {
            tracing::warn!("no report formats configured; only the console table will be produced");
        }
        Ok(())
    }

    /// Converts the policy section into a [`RunPolicy`].
    pub fn run_policy(&self) -> Result<RunPolicy, RunnerError> {
        let p = &self.policy;
        let cooldown = seconds("policy.cooldown_secs", p.cooldown_secs)?;
        let timeout = p
            .timeout_secs
            .map(|t| seconds("policy.timeout_secs", t))
            .transpose()?;
        Ok(RunPolicy {
            repeats: p.repeats,
            cooldown,
            timeout,
            warmup: p.warmup,
            warmup_iterations: p.warmup_iterations,
        })
    }

    /// Sequencer settings for one target.
    pub fn sequencer_config(&self, target: &str) -> SequencerConfig {
        SequencerConfig::new(
            target,
            self.runtime.remote_dir.clone(),
            self.runtime.executable.clone(),
        )
    }

    /// Total measured executions across all models and targets.
    pub fn total_runs(&self) -> usize {
        bench_matrix::total_runs(
            &self.matrix,
            self.models.len(),
            self.policy.repeats,
            self.transport.resolved_targets().len(),
        )
    }
}

fn seconds(field: &str, value: f64) -> Result<Duration, RunnerError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| RunnerError::ConfigError(format!("{field} must be a finite, non-negative number of seconds, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_matrix::{DeviceClass, Precision};

    const FULL: &str = r#"
name = "mnv2-sweep"

[runtime]
remote_dir = "/data/local/tmp/ov"
executable = "benchmark_app"

[transport]
kind = "adb"
targets = ["R58M1234", "emulator-5554"]

[policy]
repeats = 3
cooldown_secs = 2.5
timeout_secs = 120
warmup = true
warmup_iterations = 10

[matrix]
device = ["CPU", "GPU"]
precision = ["f16"]
nthreads = [2, 4]

[[models]]
name = "mobilenet_v2"
path = "models/mobilenet_v2.xml"

[[models]]
name = "resnet50"
path = "/sdcard/resnet50.xml"

[report]
output_dir = "out"
formats = ["csv"]
"#;

    #[test]
    fn test_from_toml_full() {
        let c = ExperimentConfig::from_toml(FULL).unwrap();
        c.validate().unwrap();
        assert_eq!(c.name, "mnv2-sweep");
        assert_eq!(c.runtime.remote_dir, "/data/local/tmp/ov");
        assert_eq!(c.transport.targets.len(), 2);
        assert_eq!(c.matrix.device, vec![DeviceClass::Cpu, DeviceClass::Gpu]);
        assert_eq!(c.matrix.precision, vec![Precision::F16]);
        assert_eq!(c.models.len(), 2);
        assert_eq!(c.report.formats, vec![ReportFormat::Csv]);
        assert!(c.report.save_raw);
    }

    #[test]
    fn test_run_policy_conversion() {
        let c = ExperimentConfig::from_toml(FULL).unwrap();
        let p = c.run_policy().unwrap();
        assert_eq!(p.repeats, 3);
        assert_eq!(p.cooldown, Duration::from_millis(2500));
        assert_eq!(p.timeout, Some(Duration::from_secs(120)));
        assert!(p.warmup);
        assert_eq!(p.warmup_iterations, Some(10));
    }

    #[test]
    fn test_total_runs() {
        let c = ExperimentConfig::from_toml(FULL).unwrap();
        // 2 models × (2 devices × 2 thread counts) × 3 repeats × 2 targets.
        assert_eq!(c.total_runs(), 48);
    }

    #[test]
    fn test_minimal_defaults() {
        let c = ExperimentConfig::from_toml(
            r#"
name = "local"
[transport]
kind = "local"
[[models]]
name = "m"
path = "m.xml"
"#,
        )
        .unwrap();
        c.validate().unwrap();
        assert_eq!(c.runtime, RuntimeSection::default());
        assert_eq!(c.policy, PolicySection::default());
        assert_eq!(c.total_runs(), 1);
    }

    #[test]
    fn test_no_models() {
        let c = ExperimentConfig::from_toml("name = \"x\"\nmodels = []").unwrap();
        assert!(matches!(c.validate(), Err(RunnerError::ConfigError(_))));
    }

    #[test]
    fn test_duplicate_model_names() {
        let c = ExperimentConfig::from_toml(
            r#"
name = "dup"
[[models]]
name = "m"
path = "a.xml"
[[models]]
name = "m"
path = "b.xml"
"#,
        )
        .unwrap();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_adb_without_targets() {
        let mut c = ExperimentConfig::from_toml(FULL).unwrap();
        c.transport.targets.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_negative_cooldown() {
        let mut c = ExperimentConfig::from_toml(FULL).unwrap();
        c.policy.cooldown_secs = -1.0;
        assert!(c.run_policy().is_err());
    }

    #[test]
    fn test_empty_axis_is_config_error() {
        let mut c = ExperimentConfig::from_toml(FULL).unwrap();
        c.matrix.api.clear();
        assert!(matches!(c.validate(), Err(RunnerError::InvalidSpec(_))));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = ExperimentConfig::from_toml(FULL).unwrap();
        let toml = c.to_toml().unwrap();
        let back = ExperimentConfig::from_toml(&toml).unwrap();
        assert_eq!(back.models, c.models);
        assert_eq!(back.matrix, c.matrix);
        assert_eq!(back.policy, c.policy);
    }

    #[test]
    fn test_sequencer_config() {
        let c = ExperimentConfig::from_toml(FULL).unwrap();
        let s = c.sequencer_config("R58M1234");
        assert_eq!(s.target, "R58M1234");
        assert_eq!(s.remote_dir, "/data/local/tmp/ov");
        assert_eq!(s.executable, "benchmark_app");
    }
}
