// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Child-process execution with a deadline.
//!
//! stdout and stderr are drained on dedicated reader threads into shared
//! buffers, so a chatty child can never block on a full pipe and a timed-out
//! child still yields everything it printed before it was killed.
//!
//! ```text
//! spawn ──► reader threads ──► Arc<Mutex<Vec<u8>>>
//!   │
//!   └─► try_wait() every POLL_INTERVAL ──► exit  ──► Ok(CommandOutput)
//!                                     └─► deadline ──► killpg ──► Err(Timeout)
//! ```
//!
//! On Unix the child leads its own process group. Commands are usually
//! compound (`cd … && ./benchmark_app …`), so the real workload is a
//! grandchild of the shell; killing the group on the deadline takes it down
//! too, and with it every writer holding the pipes open.

use crate::{CommandOutput, ExecError};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long to wait for the pipes to reach EOF once the child is gone.
///
/// A grandchild that inherited the pipes can keep them open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs `cmd` to completion or until `timeout` expires.
pub(crate) fn run(mut cmd: Command, timeout: Option<Duration>) -> Result<CommandOutput, ExecError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .spawn()
        .map_err(|source| ExecError::Spawn { program, source })?;

    let stdout = Capture::start(child.stdout.take());
    let stderr = Capture::start(child.stderr.take());

    let status = wait_with_deadline(&mut child, timeout)?;

    let stdout = stdout.finish();
    let stderr = stderr.finish();

    match status {
        Some(status) => Ok(CommandOutput {
            exit_code: exit_code(status),
            stdout,
            stderr,
        }),
        None => Err(ExecError::Timeout {
            after: timeout.unwrap_or_default(),
            stdout,
            stderr,
        }),
    }
}

/// Waits for `child`; returns `None` if it had to be killed.
fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>, ExecError> {
    let Some(limit) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            tracing::debug!("deadline of {limit:?} reached, killing pid {}", child.id());
            kill_group(child);
            let _ = child.wait();
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Sends SIGKILL to the child's process group.
#[cfg(unix)]
fn kill_group(child: &mut Child) {
    let pgid = child.id() as libc::pid_t;
    // SAFETY: killpg only sends a signal. The group was created at spawn
    // with the child as leader and cannot be recycled before we reap it.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        // The child may have exited between try_wait and kill.
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) {
    let _ = child.kill();
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// A pipe being drained on a background thread.
struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: Option<Receiver<()>>,
}

impl Capture {
    fn start<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let Some(mut pipe) = pipe else {
            return Self { buffer, done: None };
        };

        let (tx, rx) = mpsc::channel();
        let sink = Arc::clone(&buffer);
        std::thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => match sink.lock() {
                        Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                        Err(_) => break,
                    },
                }
            }
            let _ = tx.send(());
        });

        Self {
            buffer,
            done: Some(rx),
        }
    }

    /// Waits briefly for EOF, then returns whatever has been read.
    fn finish(self) -> String {
        if let Some(done) = self.done {
            if done.recv_timeout(DRAIN_GRACE).is_err() {
                tracing::debug!("pipe still open after {DRAIN_GRACE:?}; returning partial output");
            }
        }
        let bytes = match self.buffer.lock() {
            Ok(buf) => buf.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
