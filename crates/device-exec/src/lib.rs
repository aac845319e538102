// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # device-exec
//!
//! Runs shell commands on benchmark targets (phones, SBCs, the local host)
//! and returns what they printed.
//!
//! # Transports
//!
//! | Executor | Target id | Invocation |
//! |---|---|---|
//! | [`AdbExecutor`] | device serial | `adb -s <serial> shell <cmd>` |
//! | [`SshExecutor`] | host or ssh alias | `ssh -o BatchMode=yes <host> <cmd>` |
//! | [`LocalExecutor`] | ignored | `sh -c <cmd>` |
//!
//! All of them implement [`RemoteExecutor`], so the run sequencer never
//! needs to know which relay carries its commands.
//!
//! # Failure Model
//!
//! A command that runs and exits non-zero is **not** an error: it comes back
//! as `Ok(CommandOutput)` with the exit code. Errors are reserved for the
//! cases where no exit code exists: the deadline expired
//! ([`ExecError::Timeout`], carrying whatever output arrived in time) or the
//! relay binary could not be started at all.
//!
//! Executors never retry. Health checks and reconnection belong to the
//! caller.
//!
//! # Example
//! ```no_run
//! use device_exec::{AdbExecutor, RemoteExecutor};
//! use std::time::Duration;
//!
//! let adb = AdbExecutor::default();
//! let out = adb
//!     .execute("R58M1234", "getprop ro.product.model", Some(Duration::from_secs(10)))
//!     .expect("adb is installed");
//! println!("{}", out.stdout.trim());
//! ```

mod error;
mod executor;
mod process;
pub mod thermal;
pub mod transport;

pub use error::ExecError;
pub use executor::{CommandOutput, RemoteExecutor};
pub use thermal::ThermalInfo;
pub use transport::adb::{AdbExecutor, DeviceEntry};
pub use transport::local::LocalExecutor;
pub use transport::ssh::SshExecutor;
pub use transport::{TransportConfig, TransportKind};
