// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Cartesian expansion of a [`ParameterMatrix`] into [`BenchmarkSpec`]s.
//!
//! Expansion is purely algorithmic (no I/O), so identical inputs always
//! yield identical, identically-ordered spec lists.

use crate::{BenchmarkSpec, MatrixError, ModelRef, ParameterMatrix};

/// Expands `matrix` for one model.
///
/// Nesting order, outermost first: device, api, niter, nireq, nstreams,
/// nthreads, precision. The returned list has exactly
/// [`combination_count`] entries.
///
/// # Errors
/// Fails fast with a [`MatrixError`] if any axis is empty, contains a
/// duplicate or out-of-range value, or the model reference is incomplete.
pub fn expand(matrix: &ParameterMatrix, model: &ModelRef) -> Result<Vec<BenchmarkSpec>, MatrixError> {
    matrix.validate()?;
    model.validate()?;

    let mut specs = Vec::with_capacity(combination_count(matrix));
    for &device in &matrix.device {
        for &api in &matrix.api {
            for &niter in &matrix.niter {
                for &nireq in &matrix.nireq {
                    for &nstreams in &matrix.nstreams {
                        for &nthreads in &matrix.nthreads {
                            for &precision in &matrix.precision {
                                specs.push(BenchmarkSpec {
                                    model: model.name.clone(),
                                    model_path: model.path.clone(),
                                    device,
                                    api,
                                    niter,
                                    nireq,
                                    nstreams,
                                    nthreads,
                                    precision,
                                    hint: matrix.hint,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    tracing::debug!(
        "expanded {} specs for model '{}'",
        specs.len(),
        model.name,
    );
    Ok(specs)
}

/// Expands `matrix` for every model, in model order.
///
/// Specs for the first model come first; within a model the ordering is
/// that of [`expand`].
pub fn expand_all(matrix: &ParameterMatrix, models: &[ModelRef]) -> Result<Vec<BenchmarkSpec>, MatrixError> {
    let mut all = Vec::with_capacity(combination_count(matrix) * models.len());
    for model in models {
        all.extend(expand(matrix, model)?);
    }
    Ok(all)
}

/// Number of combinations: the product of all axis lengths.
pub fn combination_count(matrix: &ParameterMatrix) -> usize {
    matrix.axis_lengths().iter().map(|(_, len)| len).product()
}

/// Total executions for an experiment.
///
/// `Σ models (combinations × repeats) × devices`. Warmup invocations are
/// not counted.
pub fn total_runs(matrix: &ParameterMatrix, num_models: usize, repeats: u32, num_devices: usize) -> usize {
    num_models * combination_count(matrix) * repeats as usize * num_devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiMode, DeviceClass, PerformanceHint, Precision};

    fn model() -> ModelRef {
        ModelRef::new("mobilenet_v2", "models/mobilenet_v2.xml")
    }

    fn wide_matrix() -> ParameterMatrix {
        ParameterMatrix {
            device: vec![DeviceClass::Cpu, DeviceClass::Gpu],
            api: vec![ApiMode::Sync, ApiMode::Async],
            niter: vec![10],
            nireq: vec![1, 2],
            nstreams: vec![1],
            nthreads: vec![2, 4],
            precision: vec![Precision::F32, Precision::F16],
            hint: None,
        }
    }

    #[test]
    fn test_cardinality_is_product() {
        let m = wide_matrix();
        let specs = expand(&m, &model()).unwrap();
        assert_eq!(specs.len(), 2 * 2 * 1 * 2 * 1 * 2 * 2);
        assert_eq!(specs.len(), combination_count(&m));
    }

    #[test]
    fn test_innermost_varies_fastest() {
        let specs = expand(&wide_matrix(), &model()).unwrap();
        assert_eq!(specs[0].precision, Precision::F32);
        assert_eq!(specs[1].precision, Precision::F16);
        assert_eq!(specs[0].nthreads, specs[1].nthreads);
        assert_eq!(specs[2].nthreads, 4);
        // Device is outermost: the second half is all GPU.
        let half = specs.len() / 2;
        assert!(specs[..half].iter().all(|s| s.device == DeviceClass::Cpu));
        assert!(specs[half..].iter().all(|s| s.device == DeviceClass::Gpu));
    }

    #[test]
    fn test_deterministic() {
        let a = expand(&wide_matrix(), &model()).unwrap();
        let b = expand(&wide_matrix(), &model()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_identical_specs() {
        let specs = expand(&wide_matrix(), &model()).unwrap();
        let keys: std::collections::HashSet<String> =
            specs.iter().map(|s| s.config_key()).collect();
        assert_eq!(keys.len(), specs.len());
    }

    #[test]
    fn test_hint_propagates() {
        let m = ParameterMatrix {
            hint: Some(PerformanceHint::Throughput),
            ..Default::default()
        };
        let specs = expand(&m, &model()).unwrap();
        assert_eq!(specs[0].hint, Some(PerformanceHint::Throughput));
    }

    #[test]
    fn test_empty_axis_fails_fast() {
        let m = ParameterMatrix {
            device: vec![],
            ..wide_matrix()
        };
        assert_eq!(
            expand(&m, &model()),
            Err(MatrixError::EmptyAxis { axis: "device" })
        );
    }

    #[test]
    fn test_expand_all_orders_by_model() {
        let models = [ModelRef::new("a", "a.xml"), ModelRef::new("b", "b.xml")];
        let m = ParameterMatrix {
            nireq: vec![1, 2, 3],
            ..Default::default()
        };
        let specs = expand_all(&m, &models).unwrap();
        assert_eq!(specs.len(), 6);
        assert!(specs[..3].iter().all(|s| s.model == "a"));
        assert!(specs[3..].iter().all(|s| s.model == "b"));
    }

    #[test]
    fn test_total_runs() {
        let m = wide_matrix();
        // 2 models × 32 combos × 3 repeats × 2 devices.
        assert_eq!(total_runs(&m, 2, 3, 2), 384);
        assert_eq!(total_runs(&m, 1, 0, 1), 0);
    }
}
