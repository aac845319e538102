// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for parsing patterns and report sinks.

/// Errors that can occur when building parsers or writing reports.
///
/// Malformed benchmark output is never an error; unparseable fields are
/// skipped.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A metric pattern is not a valid regular expression.
    #[error("invalid pattern for metric '{name}': {source}")]
    Pattern {
        name: String,
        source: regex::Error,
    },

    /// A metric pattern has no capture group for the value.
    #[error("pattern for metric '{name}' has no capture group")]
    MissingCapture { name: String },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialisation error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialisation error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A raw-results line could not be decoded.
    #[error("raw results line {line}: {source}")]
    RawRecord {
        line: usize,
        source: serde_json::Error,
    },
}
