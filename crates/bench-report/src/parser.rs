// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tolerant extraction of numeric metrics from benchmark tool output.
//!
//! The parser is a [`MetricRegistry`]: a list of `(name, pattern, kind)`
//! triples tried independently against the whole text. A metric appears in
//! the result only if its pattern matched and the captured text is a valid
//! number of the declared kind. Nothing is ever defaulted to zero.
//!
//! # Default Patterns
//!
//! ```text
//! [ INFO ] Read model took 23.45 ms              → read_model_ms
//! [ INFO ] Compile model took 345.67 ms          → compile_model_ms
//! [ INFO ] First inference took 12.34 ms         → first_inference_ms
//! [ INFO ] Count:            1234 iterations     → iterations (integer)
//! [ INFO ] Duration:         60012.34 ms         → duration_ms
//! [ INFO ]    Median:        12.34 ms            → latency_median
//! [ INFO ]    Average:       12.50 ms            → latency_average
//! [ INFO ]    Min:           10.01 ms            → latency_min
//! [ INFO ]    Max:           30.00 ms            → latency_max
//! [ INFO ] Throughput:   162.07 FPS              → throughput
//! ```

use crate::ReportError;
use regex::Regex;
use std::collections::BTreeMap;

/// Numeric kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Continuous value (times, rates).
    Float,
    /// Count-like value.
    Integer,
}

/// One extracted value.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
}

impl MetricValue {
    /// The value as `f64`, for aggregation.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => format!("{v:.2}"),
        };
        f.pad(&s)
    }
}

/// Metrics extracted from one execution's output, sorted by name.
pub type ParsedMetrics = BTreeMap<String, MetricValue>;

/// A named pattern whose first capture group holds the value.
#[derive(Debug, Clone)]
pub struct MetricPattern {
    pub name: String,
    pub regex: Regex,
    pub kind: MetricKind,
}

impl MetricPattern {
    /// Compiles `pattern`. It must contain at least one capture group.
    pub fn new(name: impl Into<String>, pattern: &str, kind: MetricKind) -> Result<Self, ReportError> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|source| ReportError::Pattern {
            name: name.clone(),
            source,
        })?;
        if regex.captures_len() < 2 {
            return Err(ReportError::MissingCapture { name });
        }
        Ok(Self { name, regex, kind })
    }

    /// Applies the pattern to `text`.
    ///
    /// Returns `None` when the pattern does not match, or when the captured
    /// text is not a valid finite number of this pattern's kind.
    pub fn extract(&self, text: &str) -> Option<MetricValue> {
        let raw = self.regex.captures(text)?.get(1)?.as_str();
        let value = match self.kind {
            MetricKind::Integer => raw.parse::<i64>().ok().map(MetricValue::Integer),
            MetricKind::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(MetricValue::Float),
        };
        if value.is_none() {
            tracing::debug!("metric '{}': cannot parse '{raw}' as {:?}, skipping", self.name, self.kind);
        }
        value
    }
}

/// Built-in patterns for the runtime's benchmark tool.
const DEFAULT_PATTERNS: &[(&str, &str, MetricKind)] = &[
    ("throughput", r"Throughput:\s*(\S+)\s*FPS", MetricKind::Float),
    ("latency_median", r"(?m)^\W*(?:\[\s*\w+\s*\]\s*)?Median:\s*(\S+)\s*ms", MetricKind::Float),
    ("latency_average", r"(?m)^\W*(?:\[\s*\w+\s*\]\s*)?Average:\s*(\S+)\s*ms", MetricKind::Float),
    ("latency_min", r"(?m)^\W*(?:\[\s*\w+\s*\]\s*)?Min:\s*(\S+)\s*ms", MetricKind::Float),
    ("latency_max", r"(?m)^\W*(?:\[\s*\w+\s*\]\s*)?Max:\s*(\S+)\s*ms", MetricKind::Float),
    ("iterations", r"Count:\s*(\S+)\s*iterations", MetricKind::Integer),
    ("duration_ms", r"Duration:\s*(\S+)\s*ms", MetricKind::Float),
    ("first_inference_ms", r"First inference took\s*(\S+)\s*ms", MetricKind::Float),
    ("read_model_ms", r"Read model took\s*(\S+)\s*ms", MetricKind::Float),
    ("compile_model_ms", r"Compile model took\s*(\S+)\s*ms", MetricKind::Float),
];

/// Ordered set of metric patterns.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    patterns: Vec<MetricPattern>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .filter_map(|(name, pattern, kind)| match MetricPattern::new(*name, pattern, *kind) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::error!("built-in {e}");
                    None
                }
            })
            .collect();
        Self { patterns }
    }
}

impl MetricRegistry {
    /// A registry with no patterns.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Adds a pattern. A pattern with an existing name replaces it.
    pub fn with_pattern(mut self, pattern: MetricPattern) -> Self {
        match self.patterns.iter_mut().find(|p| p.name == pattern.name) {
            Some(slot) => *slot = pattern,
            None => self.patterns.push(pattern),
        }
        self
    }

    /// Metric names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Extracts every metric whose pattern matches `text`.
    pub fn parse(&self, text: &str) -> ParsedMetrics {
        self.patterns
            .iter()
            .filter_map(|p| p.extract(text).map(|v| (p.name.clone(), v)))
            .collect()
    }
}

/// Parses `text` with the default registry.
pub fn parse(text: &str) -> ParsedMetrics {
    MetricRegistry::default().parse(text)
}
