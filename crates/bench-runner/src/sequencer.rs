// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The run sequencer.
//!
//! ```text
//! for spec in specs:                       (matrix order)
//!     [cooldown] warmup                    (first spec of each model, optional)
//!     for repeat in 0..R:
//!         [cooldown]                       (never before the batch's first run,
//!                                           never right after a warmup)
//!         execute → ExecutionResult        (recorded whatever the outcome)
//!         progress(done, total)
//! ```
//!
//! One sequencer drives one target and owns its result list; nothing here is
//! shared between threads. Fan-out across devices means one sequencer per
//! device.

use crate::{CommandTemplate, ExecutionResult, FailureKind, RunPolicy, RunnerError};
use bench_matrix::BenchmarkSpec;
use device_exec::{ExecError, RemoteExecutor};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Where and how commands are run for one sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Target id passed to the executor (ADB serial, SSH host).
    pub target: String,
    /// Working directory on the target.
    pub remote_dir: String,
    /// Benchmark executable, relative to `remote_dir` or absolute.
    pub executable: String,
    /// Timeout used when the policy does not set one.
    pub default_timeout: Option<Duration>,
}

impl SequencerConfig {
    pub fn new(
        target: impl Into<String>,
        remote_dir: impl Into<String>,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            remote_dir: remote_dir.into(),
            executable: executable.into(),
            default_timeout: None,
        }
    }
}

/// Blocking delay used for cooldowns.
pub trait Sleeper: Send {
    fn sleep(&mut self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

type ProgressFn = Box<dyn FnMut(usize, usize) + Send>;

/// Executes benchmark specs against a single target.
pub struct RunSequencer {
    executor: Arc<dyn RemoteExecutor>,
    config: SequencerConfig,
    template: CommandTemplate,
    sleeper: Box<dyn Sleeper>,
    progress: Option<ProgressFn>,
}

impl std::fmt::Debug for RunSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSequencer")
            .field("executor", &self.executor.name())
            .field("config", &self.config)
            .field("has_progress", &self.progress.is_some())
            .finish()
    }
}

impl RunSequencer {
    pub fn new(executor: Arc<dyn RemoteExecutor>, config: SequencerConfig) -> Self {
        let template = CommandTemplate::new(config.remote_dir.clone(), config.executable.clone());
        Self {
            executor,
            config,
            template,
            sleeper: Box::new(ThreadSleeper),
            progress: None,
        }
    }

    /// Replaces the cooldown sleeper.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Registers a callback invoked with `(completed, total)` after every
    /// measured execution, failed ones included.
    pub fn on_progress(mut self, callback: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// The target this sequencer drives.
    pub fn target(&self) -> &str {
        &self.config.target
    }

    /// Runs every spec `policy.repeats` times, in order.
    ///
    /// Returns exactly `specs.len() × repeats` results. Failed executions are
    /// recorded, not raised.
    ///
    /// # Errors
    /// [`RunnerError`] if the policy or any spec is invalid. Validation
    /// happens up front, so an error means nothing was executed.
    pub fn run_matrix(
        &mut self,
        specs: &[BenchmarkSpec],
        policy: &RunPolicy,
    ) -> Result<Vec<ExecutionResult>, RunnerError> {
        policy.validate()?;
        for spec in specs {
            spec.validate()?;
        }

        let total = specs.len() * policy.repeats as usize;
        let timeout = policy.timeout.or(self.config.default_timeout);
        tracing::info!(
            "target '{}' via {}: {} specs × {} repeats = {total} runs (cooldown {:?}, timeout {:?}, warmup {})",
            self.config.target,
            self.executor.name(),
            specs.len(),
            policy.repeats,
            policy.cooldown,
            timeout,
            policy.warmup,
        );

        let mut results = Vec::with_capacity(total);
        let mut warmed_models: HashSet<&str> = HashSet::new();
        let mut executed_any = false;

        for spec in specs {
            let mut just_warmed = false;
            if policy.warmup && warmed_models.insert(spec.model.as_str()) {
                if executed_any {
                    self.cooldown(policy.cooldown);
                }
                self.warmup(spec, policy, timeout);
                executed_any = true;
                just_warmed = true;
            }

            for repeat in 0..policy.repeats {
                if executed_any && !just_warmed {
                    self.cooldown(policy.cooldown);
                }
                just_warmed = false;

                let result = self.execute_once(spec, repeat, timeout);
                executed_any = true;
                results.push(result);

                if let Some(progress) = self.progress.as_mut() {
                    progress(results.len(), total);
                }
            }
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        tracing::info!(
            "target '{}': {} runs finished, {failed} failed",
            self.config.target,
            results.len(),
        );
        Ok(results)
    }

    fn cooldown(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tracing::debug!("cooldown {:.1}s", duration.as_secs_f64());
        self.sleeper.sleep(duration);
    }

    /// Best-effort, unrecorded execution before a model's first measured run.
    fn warmup(&self, spec: &BenchmarkSpec, policy: &RunPolicy, timeout: Option<Duration>) {
        let niter = policy.warmup_iterations.unwrap_or(spec.niter);
        let command = self.template.render_with_iterations(spec, niter);
        tracing::info!("warmup for model '{}' ({niter} iterations)", spec.model);
        tracing::debug!("$ {command}");

        match self.executor.execute(&self.config.target, &command, timeout) {
            Ok(out) if out.success() => {}
            Ok(out) => tracing::warn!(
                "warmup for '{}' exited with {}; continuing with measured runs",
                spec.model,
                out.exit_code,
            ),
            Err(e) => tracing::warn!(
                "warmup for '{}' failed: {e}; continuing with measured runs",
                spec.model,
            ),
        }
    }

    fn execute_once(&self, spec: &BenchmarkSpec, repeat: u32, timeout: Option<Duration>) -> ExecutionResult {
        let command = self.template.render(spec);
        tracing::debug!("[{}] repeat {repeat} $ {command}", spec.label());

        let start = Instant::now();
        let outcome = self.executor.execute(&self.config.target, &command, timeout);
        let duration = start.elapsed();

        let (exit_code, failure, stdout, stderr) = match outcome {
            Ok(out) => {
                let failure = (!out.success()).then_some(FailureKind::NonZeroExit);
                (Some(out.exit_code), failure, out.stdout, out.stderr)
            }
            Err(ExecError::Timeout { stdout, stderr, .. }) => {
                (None, Some(FailureKind::Timeout), stdout, stderr)
            }
            Err(e) => (None, Some(FailureKind::Transport), String::new(), e.to_string()),
        };

        let result = ExecutionResult {
            spec: spec.clone(),
            target: self.config.target.clone(),
            command,
            exit_code,
            failure,
            stdout,
            stderr,
            duration,
            finished_at_ms: now_ms(),
            repeat,
        };

        if result.is_success() {
            tracing::debug!("[{}] repeat {repeat}: {}", spec.label(), result.status_label());
        } else {
            tracing::warn!(
                "[{}] repeat {repeat} failed: {} {}",
                spec.label(),
                result.status_label(),
                result.stderr.lines().last().unwrap_or_default(),
            );
        }
        result
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_matrix::{expand, ModelRef, ParameterMatrix};
    use device_exec::CommandOutput;
    use std::sync::Mutex;

    /// Replies to every command with exit 0 and a throughput line.
    struct Echo;

    impl RemoteExecutor for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn execute(&self, _: &str, _: &str, _: Option<Duration>) -> Result<CommandOutput, ExecError> {
            Ok(CommandOutput {
                exit_code: 0,
                stdout: "Throughput: 100.00 FPS\n".into(),
                stderr: String::new(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct CountingSleeper(Arc<Mutex<Vec<Duration>>>);

    impl Sleeper for CountingSleeper {
        fn sleep(&mut self, duration: Duration) {
            self.0.lock().unwrap().push(duration);
        }
    }

    fn specs(n: u32) -> Vec<BenchmarkSpec> {
        let m = ParameterMatrix {
            niter: (1..=n).collect(),
            ..Default::default()
        };
        expand(&m, &ModelRef::new("m", "m.xml")).unwrap()
    }

    fn sequencer(sleeper: CountingSleeper) -> RunSequencer {
        RunSequencer::new(Arc::new(Echo), SequencerConfig::new("dev", "/tmp/b", "bench"))
            .with_sleeper(sleeper)
    }

    #[test]
    fn test_cooldown_count_between_runs() {
        let sleeper = CountingSleeper::default();
        let mut seq = sequencer(sleeper.clone());
        let policy = RunPolicy {
            repeats: 2,
            cooldown: Duration::from_secs(3),
            ..Default::default()
        };
        let results = seq.run_matrix(&specs(3), &policy).unwrap();
        assert_eq!(results.len(), 6);
        // One cooldown between each consecutive pair of runs.
        let sleeps = sleeper.0.lock().unwrap();
        assert_eq!(sleeps.len(), 5);
        assert!(sleeps.iter().all(|d| *d == Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_cooldown_never_sleeps() {
        let sleeper = CountingSleeper::default();
        let mut seq = sequencer(sleeper.clone());
        seq.run_matrix(&specs(2), &RunPolicy::default()).unwrap();
        assert!(sleeper.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_progress_reports_every_run() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut seq = sequencer(CountingSleeper::default())
            .on_progress(move |done, total| sink.lock().unwrap().push((done, total)));
        let policy = RunPolicy {
            repeats: 2,
            ..Default::default()
        };
        seq.run_matrix(&specs(2), &policy).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_invalid_policy_runs_nothing() {
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let mut seq = sequencer(CountingSleeper::default())
            .on_progress(move |_, _| *sink.lock().unwrap() += 1);
        let policy = RunPolicy {
            repeats: 0,
            ..Default::default()
        };
        assert!(seq.run_matrix(&specs(2), &policy).is_err());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_empty_spec_list() {
        let mut seq = sequencer(CountingSleeper::default());
        let results = seq.run_matrix(&[], &RunPolicy::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_debug_format() {
        let seq = sequencer(CountingSleeper::default());
        let dbg = format!("{seq:?}");
        assert!(dbg.contains("echo"));
        assert!(dbg.contains("dev"));
    }
}
