// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Repeat, cooldown, timeout and warmup policy for one batch.

use crate::RunnerError;
use std::time::Duration;

/// How a batch of specs is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPolicy {
    /// Measured executions per spec. Must be at least 1.
    pub repeats: u32,
    /// Idle time inserted between consecutive executions.
    pub cooldown: Duration,
    /// Per-execution ceiling. Overrides the sequencer's default when set.
    pub timeout: Option<Duration>,
    /// Run one unrecorded warmup per model before its first measured run.
    pub warmup: bool,
    /// Iteration count for warmup invocations; `None` keeps the spec's own.
    pub warmup_iterations: Option<u32>,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            repeats: 1,
            cooldown: Duration::ZERO,
            timeout: None,
            warmup: false,
            warmup_iterations: None,
        }
    }
}

impl RunPolicy {
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.repeats == 0 {
            return Err(RunnerError::InvalidPolicy(
                "repeats must be at least 1".into(),
            ));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(RunnerError::InvalidPolicy(
                "timeout must be greater than zero".into(),
            ));
        }
        if self.warmup_iterations == Some(0) {
            return Err(RunnerError::InvalidPolicy(
                "warmup_iterations must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        RunPolicy::default().validate().unwrap();
    }

    #[test]
    fn test_zero_repeats() {
        let p = RunPolicy {
            repeats: 0,
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(RunnerError::InvalidPolicy(_))));
    }

    #[test]
    fn test_zero_timeout() {
        let p = RunPolicy {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_zero_warmup_iterations() {
        let p = RunPolicy {
            warmup: true,
            warmup_iterations: Some(0),
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }
}
