// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Value types for the enumerated matrix axes.
//!
//! Numeric axes (iteration count, request concurrency, streams, threads) are
//! plain integers. The enumerated axes live here: each has a canonical
//! spelling used on the benchmark command line and in report keys, plus a
//! loose parser that accepts the aliases people actually type.

use crate::MatrixError;

/// The class of compute device the runtime should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceClass {
    /// Application processor cores.
    #[serde(alias = "cpu")]
    Cpu,
    /// Integrated or discrete GPU.
    #[serde(alias = "gpu")]
    Gpu,
    /// Dedicated neural accelerator.
    #[serde(alias = "npu")]
    Npu,
}

impl DeviceClass {
    /// Parses a device class, case-insensitively.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Some(Self::Cpu),
            "gpu" | "igpu" => Some(Self::Gpu),
            "npu" | "vpu" | "nnapi" => Some(Self::Npu),
            _ => None,
        }
    }

    /// Returns the spelling the benchmark tool expects (`-d CPU`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Gpu => "GPU",
            Self::Npu => "NPU",
        }
    }
}

/// Synchronous or asynchronous inference request API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    Sync,
    Async,
}

impl ApiMode {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sync" | "synchronous" => Some(Self::Sync),
            "async" | "asynchronous" => Some(Self::Async),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}

/// Numeric precision requested for inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 32-bit IEEE float.
    #[serde(alias = "float32", alias = "fp32")]
    F32,
    /// 16-bit IEEE float.
    #[serde(alias = "float16", alias = "fp16")]
    F16,
    /// Brain float 16.
    #[serde(alias = "bfloat16")]
    Bf16,
    /// 8-bit integer (quantized).
    #[serde(alias = "int8")]
    I8,
}

impl Precision {
    /// Parses a precision string.
    ///
    /// Accepts the canonical names (`"f16"`) as well as the common aliases
    /// (`"fp16"`, `"float16"`, `"int8"`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "f32" | "fp32" | "float32" => Some(Self::F32),
            "f16" | "fp16" | "float16" => Some(Self::F16),
            "bf16" | "bfloat16" => Some(Self::Bf16),
            "i8" | "int8" | "u8" => Some(Self::I8),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::Bf16 => "bf16",
            Self::I8 => "i8",
        }
    }
}

/// High-level performance hint.
///
/// When a hint is present the runtime picks its own stream, request and
/// thread counts, so the explicit flags for those axes are left off the
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceHint {
    Latency,
    Throughput,
    CumulativeThroughput,
}

impl PerformanceHint {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "latency" => Some(Self::Latency),
            "throughput" | "tput" => Some(Self::Throughput),
            "cumulative_throughput" | "ctput" => Some(Self::CumulativeThroughput),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Throughput => "throughput",
            Self::CumulativeThroughput => "cumulative_throughput",
        }
    }
}

macro_rules! impl_display_and_parse {
    ($ty:ty, $axis:literal) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = MatrixError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_str_loose(s).ok_or_else(|| MatrixError::UnknownVariant {
                    axis: $axis,
                    value: s.to_string(),
                })
            }
        }
    };
}

impl_display_and_parse!(DeviceClass, "device");
impl_display_and_parse!(ApiMode, "api");
impl_display_and_parse!(Precision, "precision");
impl_display_and_parse!(PerformanceHint, "hint");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_loose_parse() {
        assert_eq!(DeviceClass::from_str_loose("cpu"), Some(DeviceClass::Cpu));
        assert_eq!(DeviceClass::from_str_loose(" GPU "), Some(DeviceClass::Gpu));
        assert_eq!(DeviceClass::from_str_loose("tpu"), None);
    }

    #[test]
    fn test_precision_aliases() {
        assert_eq!(Precision::from_str_loose("FP16"), Some(Precision::F16));
        assert_eq!(Precision::from_str_loose("float32"), Some(Precision::F32));
        assert_eq!(Precision::from_str_loose("int8"), Some(Precision::I8));
        assert_eq!(Precision::from_str_loose("f64"), None);
    }

    #[test]
    fn test_from_str_error_names_axis() {
        let err = "bogus".parse::<ApiMode>().unwrap_err();
        assert_eq!(
            err,
            MatrixError::UnknownVariant {
                axis: "api",
                value: "bogus".into()
            }
        );
    }

    #[test]
    fn test_display_is_command_line_spelling() {
        assert_eq!(DeviceClass::Npu.to_string(), "NPU");
        assert_eq!(ApiMode::Async.to_string(), "async");
        assert_eq!(Precision::Bf16.to_string(), "bf16");
        assert_eq!(
            PerformanceHint::CumulativeThroughput.to_string(),
            "cumulative_throughput"
        );
    }

    #[test]
    fn test_serde_accepts_lowercase_device() {
        let d: DeviceClass = serde_json::from_str("\"gpu\"").unwrap();
        assert_eq!(d, DeviceClass::Gpu);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"GPU\"");
    }
}
