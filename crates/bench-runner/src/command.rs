// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Translation of a [`BenchmarkSpec`] into one shell command line.
//!
//! ```text
//! cd <dir> && LD_LIBRARY_PATH=<dir>:$LD_LIBRARY_PATH ./<exe> \
//!     -m <model> -d <DEVICE> -api <api> -niter <n> -infer_precision <p> \
//!     [-hint <hint>]                                  # hint set
//!     [-hint none -nireq <n> -nstreams <n> [-nthreads <n>]]   # no hint
//! ```
//!
//! A performance hint and the explicit request/stream/thread flags are
//! mutually exclusive: with a hint the runtime sizes those itself.
//! `-nthreads` is omitted when the spec asks for `0` threads.

use bench_matrix::BenchmarkSpec;

/// Executable location and working directory on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    remote_dir: String,
    executable: String,
}

impl CommandTemplate {
    pub fn new(remote_dir: impl Into<String>, executable: impl Into<String>) -> Self {
        let remote_dir: String = remote_dir.into();
        let trimmed = remote_dir.trim_end_matches('/');
        Self {
            remote_dir: if trimmed.is_empty() { "/".into() } else { trimmed.into() },
            executable: executable.into(),
        }
    }

    /// Renders the measured command for `spec`.
    pub fn render(&self, spec: &BenchmarkSpec) -> String {
        self.render_with_iterations(spec, spec.niter)
    }

    /// Renders the command for `spec` with `niter` replaced.
    pub fn render_with_iterations(&self, spec: &BenchmarkSpec, niter: u32) -> String {
        let dir = shell_quote(&self.remote_dir);
        let mut args = vec![
            format!("cd {dir} &&"),
            format!("LD_LIBRARY_PATH={dir}:$LD_LIBRARY_PATH"),
            shell_quote(&self.executable_path()),
            "-m".into(),
            shell_quote(&self.model_path(&spec.model_path)),
            "-d".into(),
            spec.device.to_string(),
            "-api".into(),
            spec.api.to_string(),
            "-niter".into(),
            niter.to_string(),
            "-infer_precision".into(),
            spec.precision.to_string(),
        ];

        match spec.hint {
            Some(hint) => {
                args.push("-hint".into());
                args.push(hint.to_string());
            }
            None => {
                args.extend([
                    "-hint".into(),
                    "none".into(),
                    "-nireq".into(),
                    spec.nireq.to_string(),
                    "-nstreams".into(),
                    spec.nstreams.to_string(),
                ]);
                if spec.nthreads > 0 {
                    args.push("-nthreads".into());
                    args.push(spec.nthreads.to_string());
                }
            }
        }

        args.join(" ")
    }

    /// Model paths are resolved against the working directory unless absolute.
    fn model_path(&self, path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}/{}", self.remote_dir.trim_end_matches('/'), path)
        }
    }

    fn executable_path(&self) -> String {
        if self.executable.starts_with('/') || self.executable.starts_with("./") {
            self.executable.clone()
        } else {
            format!("./{}", self.executable)
        }
    }
}

/// Single-quotes `s` if it contains anything a POSIX shell would interpret.
fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+=:,@%".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_matrix::{ApiMode, DeviceClass, PerformanceHint, Precision};

    fn spec() -> BenchmarkSpec {
        BenchmarkSpec {
            model: "mnv2".into(),
            model_path: "models/mnv2.xml".into(),
            device: DeviceClass::Cpu,
            api: ApiMode::Async,
            niter: 100,
            nireq: 4,
            nstreams: 2,
            nthreads: 4,
            precision: Precision::F16,
            hint: None,
        }
    }

    fn template() -> CommandTemplate {
        CommandTemplate::new("/data/local/tmp/devbench/", "benchmark_app")
    }

    #[test]
    fn test_render_explicit_flags() {
        assert_eq!(
            template().render(&spec()),
            "cd /data/local/tmp/devbench && \
             LD_LIBRARY_PATH=/data/local/tmp/devbench:$LD_LIBRARY_PATH \
             ./benchmark_app -m /data/local/tmp/devbench/models/mnv2.xml -d CPU -api async \
             -niter 100 -infer_precision f16 -hint none -nireq 4 -nstreams 2 -nthreads 4"
        );
    }

    #[test]
    fn test_hint_excludes_tuning_flags() {
        let s = BenchmarkSpec {
            hint: Some(PerformanceHint::Latency),
            ..spec()
        };
        let cmd = template().render(&s);
        assert!(cmd.ends_with("-infer_precision f16 -hint latency"));
        assert!(!cmd.contains("-nireq"));
        assert!(!cmd.contains("-nstreams"));
        assert!(!cmd.contains("-nthreads"));
    }

    #[test]
    fn test_zero_threads_omitted() {
        let s = BenchmarkSpec {
            nthreads: 0,
            ..spec()
        };
        let cmd = template().render(&s);
        assert!(cmd.contains("-nstreams 2"));
        assert!(!cmd.contains("-nthreads"));
    }

    #[test]
    fn test_absolute_paths_verbatim() {
        let s = BenchmarkSpec {
            model_path: "/sdcard/models/a.xml".into(),
            ..spec()
        };
        let t = CommandTemplate::new("/data/local/tmp", "/system/bin/benchmark_app");
        let cmd = t.render(&s);
        assert!(cmd.contains(" /system/bin/benchmark_app -m /sdcard/models/a.xml "));
    }

    #[test]
    fn test_render_with_iterations() {
        let cmd = template().render_with_iterations(&spec(), 5);
        assert!(cmd.contains("-niter 5 "));
        assert!(!cmd.contains("-niter 100"));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(shell_quote("plain/path.xml"), "plain/path.xml");
        assert_eq!(shell_quote("my model.xml"), "'my model.xml'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_pure_function_of_spec() {
        assert_eq!(template().render(&spec()), template().render(&spec()));
    }
}
