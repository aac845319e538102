// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The declared parameter matrix, prior to expansion.
//!
//! # TOML Format
//! ```toml
//! device = ["CPU", "GPU"]
//! api = ["sync", "async"]
//! niter = [100]
//! nireq = [1, 4]
//! nstreams = [1]
//! nthreads = [0]
//! precision = ["f32", "f16"]
//! hint = "throughput"   # optional
//! ```
//!
//! An omitted axis falls back to a single default value. An axis written
//! out explicitly as `[]` is rejected by [`ParameterMatrix::validate`].

use crate::{ApiMode, DeviceClass, MatrixError, PerformanceHint, Precision};
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// One ordered list of candidate values per tunable axis.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParameterMatrix {
    /// Target device classes.
    #[serde(default = "default_device")]
    pub device: Vec<DeviceClass>,
    /// Request API modes.
    #[serde(default = "default_api")]
    pub api: Vec<ApiMode>,
    /// Iteration counts per benchmark invocation.
    #[serde(default = "default_niter")]
    pub niter: Vec<u32>,
    /// Number of concurrent inference requests.
    #[serde(default = "default_one")]
    pub nireq: Vec<u32>,
    /// Number of execution streams.
    #[serde(default = "default_one")]
    pub nstreams: Vec<u32>,
    /// Worker thread counts. `0` leaves the choice to the runtime.
    #[serde(default = "default_nthreads")]
    pub nthreads: Vec<u32>,
    /// Inference precisions.
    #[serde(default = "default_precision")]
    pub precision: Vec<Precision>,
    /// Optional high-level hint applied to every combination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<PerformanceHint>,
}

fn default_device() -> Vec<DeviceClass> {
    vec![DeviceClass::Cpu]
}

fn default_api() -> Vec<ApiMode> {
    vec![ApiMode::Async]
}

fn default_niter() -> Vec<u32> {
    vec![100]
}

fn default_one() -> Vec<u32> {
    vec![1]
}

fn default_nthreads() -> Vec<u32> {
    vec![0]
}

fn default_precision() -> Vec<Precision> {
    vec![Precision::F32]
}

impl Default for ParameterMatrix {
    fn default() -> Self {
        Self {
            device: default_device(),
            api: default_api(),
            niter: default_niter(),
            nireq: default_one(),
            nstreams: default_one(),
            nthreads: default_nthreads(),
            precision: default_precision(),
            hint: None,
        }
    }
}

impl ParameterMatrix {
    /// Validates the matrix.
    ///
    /// Checks:
    /// - Every axis has at least one value.
    /// - No axis lists the same value twice.
    /// - `niter`, `nireq` and `nstreams` values are strictly positive.
    pub fn validate(&self) -> Result<(), MatrixError> {
        check_axis("device", &self.device)?;
        check_axis("api", &self.api)?;
        check_axis("niter", &self.niter)?;
        check_axis("nireq", &self.nireq)?;
        check_axis("nstreams", &self.nstreams)?;
        check_axis("nthreads", &self.nthreads)?;
        check_axis("precision", &self.precision)?;

        check_positive("niter", &self.niter)?;
        check_positive("nireq", &self.nireq)?;
        check_positive("nstreams", &self.nstreams)?;
        Ok(())
    }

    /// Returns `(axis name, number of values)` in expansion order.
    pub fn axis_lengths(&self) -> [(&'static str, usize); 7] {
        [
            ("device", self.device.len()),
            ("api", self.api.len()),
            ("niter", self.niter.len()),
            ("nireq", self.nireq.len()),
            ("nstreams", self.nstreams.len()),
            ("nthreads", self.nthreads.len()),
            ("precision", self.precision.len()),
        ]
    }

    /// Returns a one-line description of the matrix shape.
    pub fn summary(&self) -> String {
        let dims: Vec<String> = self
            .axis_lengths()
            .iter()
            .map(|(name, len)| format!("{name}={len}"))
            .collect();
        let hint = self.hint.map(|h| h.as_str()).unwrap_or("none");
        format!(
            "Matrix: {} combinations ({}), hint {hint}",
            crate::combination_count(self),
            dims.join(" × "),
        )
    }
}

fn check_axis<T: Eq + Hash + Display>(axis: &'static str, values: &[T]) -> Result<(), MatrixError> {
    if values.is_empty() {
        return Err(MatrixError::EmptyAxis { axis });
    }
    let mut seen = HashSet::new();
    for v in values {
        if !seen.insert(v) {
            return Err(MatrixError::DuplicateValue {
                axis,
                value: v.to_string(),
            });
        }
    }
    Ok(())
}

fn check_positive(axis: &'static str, values: &[u32]) -> Result<(), MatrixError> {
    match values.iter().find(|&&v| v == 0) {
        Some(v) => Err(MatrixError::InvalidValue {
            axis,
            value: v.to_string(),
            detail: "must be greater than zero".into(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid_single_point() {
        let m = ParameterMatrix::default();
        m.validate().unwrap();
        assert!(m.axis_lengths().iter().all(|(_, len)| *len == 1));
    }

    #[test]
    fn test_empty_axis_rejected() {
        let m = ParameterMatrix {
            nstreams: vec![],
            ..Default::default()
        };
        assert_eq!(
            m.validate(),
            Err(MatrixError::EmptyAxis { axis: "nstreams" })
        );
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let m = ParameterMatrix {
            precision: vec![Precision::F16, Precision::F32, Precision::F16],
            ..Default::default()
        };
        assert!(matches!(
            m.validate(),
            Err(MatrixError::DuplicateValue { axis: "precision", .. })
        ));
    }

    #[test]
    fn test_zero_niter_rejected() {
        let m = ParameterMatrix {
            niter: vec![10, 0],
            ..Default::default()
        };
        assert!(matches!(
            m.validate(),
            Err(MatrixError::InvalidValue { axis: "niter", .. })
        ));
    }

    #[test]
    fn test_zero_threads_allowed() {
        let m = ParameterMatrix {
            nthreads: vec![0, 2, 4],
            ..Default::default()
        };
        m.validate().unwrap();
    }

    #[test]
    fn test_from_toml_with_defaults() {
        let m: ParameterMatrix = toml::from_str(
            r#"
device = ["cpu", "GPU"]
precision = ["fp16", "f32"]
hint = "latency"
"#,
        )
        .unwrap();
        assert_eq!(m.device, vec![DeviceClass::Cpu, DeviceClass::Gpu]);
        assert_eq!(m.precision, vec![Precision::F16, Precision::F32]);
        assert_eq!(m.niter, vec![100]);
        assert_eq!(m.hint, Some(PerformanceHint::Latency));
    }

    #[test]
    fn test_explicit_empty_axis_survives_parse_and_fails_validate() {
        let m: ParameterMatrix = toml::from_str("api = []").unwrap();
        assert_eq!(m.validate(), Err(MatrixError::EmptyAxis { axis: "api" }));
    }

    #[test]
    fn test_summary() {
        let m = ParameterMatrix {
            nireq: vec![1, 2],
            precision: vec![Precision::F32, Precision::F16, Precision::I8],
            ..Default::default()
        };
        let s = m.summary();
        assert!(s.contains("6 combinations"));
        assert!(s.contains("nireq=2"));
        assert!(s.contains("hint none"));
    }
}
