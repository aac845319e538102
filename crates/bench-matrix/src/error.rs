// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for matrix construction and expansion.

/// Configuration errors detected while validating or expanding a matrix.
///
/// These always indicate an authoring defect in the experiment description,
/// never a runtime condition, so they are raised immediately and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// An axis was declared with no candidate values.
    #[error("axis '{axis}' has no values")]
    EmptyAxis { axis: &'static str },

    /// The same value appears twice in one axis, which would yield identical specs.
    #[error("axis '{axis}' lists value '{value}' more than once")]
    DuplicateValue { axis: &'static str, value: String },

    /// A numeric axis value is outside its allowed range.
    #[error("axis '{axis}' has invalid value {value}: {detail}")]
    InvalidValue {
        axis: &'static str,
        value: String,
        detail: String,
    },

    /// A model reference or spec is missing a required attribute.
    #[error("missing required attribute '{attribute}' for model '{model}'")]
    MissingAttribute {
        model: String,
        attribute: &'static str,
    },

    /// A string could not be parsed into an axis value.
    #[error("unrecognised {axis} '{value}'")]
    UnknownVariant { axis: &'static str, value: String },
}
