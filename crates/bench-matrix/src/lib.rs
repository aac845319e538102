// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # bench-matrix
//!
//! Declarative parameter matrices and their expansion into concrete,
//! fully-bound [`BenchmarkSpec`]s.
//!
//! A [`ParameterMatrix`] holds one ordered list of candidate values per
//! tunable axis. [`expand()`] walks the cartesian product of those axes for
//! one model and yields one spec per combination.
//!
//! # Expansion Order
//!
//! Axes are nested in a fixed priority order, outermost first:
//!
//! ```text
//! device → api → niter → nireq → nstreams → nthreads → precision
//! ```
//!
//! The innermost axis (precision) varies fastest. The order is part of the
//! contract: report tables and any position-based tie-breaking depend on it.
//!
//! # Example
//! ```
//! use bench_matrix::{expand, ModelRef, ParameterMatrix};
//!
//! let matrix = ParameterMatrix {
//!     nthreads: vec![1, 2, 4],
//!     ..ParameterMatrix::default()
//! };
//! let model = ModelRef::new("mobilenet_v2", "models/mobilenet_v2.xml");
//! let specs = expand(&matrix, &model).unwrap();
//! assert_eq!(specs.len(), 3);
//! assert_eq!(specs[2].nthreads, 4);
//! ```

mod axis;
mod error;
mod expand;
mod matrix;
mod spec;

pub use axis::{ApiMode, DeviceClass, PerformanceHint, Precision};
pub use error::MatrixError;
pub use expand::{combination_count, expand, expand_all, total_runs};
pub use matrix::ParameterMatrix;
pub use spec::{BenchmarkSpec, ModelRef, CONFIG_KEY_SEPARATOR};
