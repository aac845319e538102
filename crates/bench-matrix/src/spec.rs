// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully-bound benchmark specs.
//!
//! A [`BenchmarkSpec`] is one point of the matrix's cartesian product, bound
//! to one model. Every attribute is a typed field; nothing is looked up by
//! name at the point of use.

use crate::{ApiMode, DeviceClass, MatrixError, PerformanceHint, Precision};

/// Separator between attribute values in a configuration key.
pub const CONFIG_KEY_SEPARATOR: char = '|';

/// A model to benchmark: a display name plus the artifact path on the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ModelRef {
    /// Short identifier used in reports (e.g., `"mobilenet_v2"`).
    pub name: String,
    /// Path to the model artifact. Relative paths are resolved against the
    /// remote working directory when the command line is built.
    pub path: String,
}

impl ModelRef {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Checks that both the name and the path are present.
    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.name.trim().is_empty() {
            return Err(MatrixError::MissingAttribute {
                model: self.path.clone(),
                attribute: "name",
            });
        }
        if self.path.trim().is_empty() {
            return Err(MatrixError::MissingAttribute {
                model: self.name.clone(),
                attribute: "path",
            });
        }
        Ok(())
    }
}

/// One concrete parameter combination for one model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkSpec {
    /// Model identifier.
    pub model: String,
    /// Model artifact path.
    pub model_path: String,
    /// Target device class.
    pub device: DeviceClass,
    /// Request API mode.
    pub api: ApiMode,
    /// Iterations per invocation.
    pub niter: u32,
    /// Concurrent inference requests.
    pub nireq: u32,
    /// Execution streams.
    pub nstreams: u32,
    /// Worker threads, `0` for the runtime default.
    pub nthreads: u32,
    /// Inference precision.
    pub precision: Precision,
    /// Optional high-level performance hint.
    #[serde(default)]
    pub hint: Option<PerformanceHint>,
}

impl BenchmarkSpec {
    /// Names of the spec attributes in configuration-key order.
    pub const FIELD_NAMES: [&'static str; 10] = [
        "model",
        "model_path",
        "device",
        "api",
        "niter",
        "nireq",
        "nstreams",
        "nthreads",
        "precision",
        "hint",
    ];

    /// Checks the attributes the command line cannot be built without.
    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.model.trim().is_empty() {
            return Err(MatrixError::MissingAttribute {
                model: self.model_path.clone(),
                attribute: "model",
            });
        }
        if self.model_path.trim().is_empty() {
            return Err(MatrixError::MissingAttribute {
                model: self.model.clone(),
                attribute: "model_path",
            });
        }
        for (axis, value) in [
            ("niter", self.niter),
            ("nireq", self.nireq),
            ("nstreams", self.nstreams),
        ] {
            if value == 0 {
                return Err(MatrixError::InvalidValue {
                    axis,
                    value: value.to_string(),
                    detail: format!("must be greater than zero for model '{}'", self.model),
                });
            }
        }
        Ok(())
    }

    /// Returns the attribute values as strings, in [`Self::FIELD_NAMES`] order.
    ///
    /// An absent hint is rendered as `"none"`.
    pub fn field_values(&self) -> [String; 10] {
        [
            self.model.clone(),
            self.model_path.clone(),
            self.device.to_string(),
            self.api.to_string(),
            self.niter.to_string(),
            self.nireq.to_string(),
            self.nstreams.to_string(),
            self.nthreads.to_string(),
            self.precision.to_string(),
            self.hint.map(|h| h.to_string()).unwrap_or_else(|| "none".into()),
        ]
    }

    /// Stable grouping key: every attribute joined in a fixed order.
    pub fn config_key(&self) -> String {
        self.field_values().join(&CONFIG_KEY_SEPARATOR.to_string())
    }

    /// Short label for logs and tables (omits the model path).
    pub fn label(&self) -> String {
        let mut s = format!(
            "{} {} {} niter={} precision={}",
            self.model, self.device, self.api, self.niter, self.precision,
        );
        match self.hint {
            Some(h) => s.push_str(&format!(" hint={h}")),
            None => s.push_str(&format!(
                " nireq={} nstreams={} nthreads={}",
                self.nireq, self.nstreams, self.nthreads,
            )),
        }
        s
    }
}
