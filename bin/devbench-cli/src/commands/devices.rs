// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `devbench devices` command: reachability and thermal state of targets.
//!
//! For ADB the attached-device list is shown first so a missing or
//! unauthorized phone is obvious before the per-target checks run.

use device_exec::thermal::ThermalInfo;
use device_exec::{AdbExecutor, TransportKind};
use std::path::PathBuf;

pub async fn execute(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    super::banner("Devices");

    let config = super::load_config(config_path.as_deref())?;
    let transport = &config.transport;

    // ── Attached (ADB) ─────────────────────────────────────────
    if transport.kind == TransportKind::Adb {
        let adb = match &transport.adb_path {
            Some(p) => AdbExecutor::with_binary(p.clone()),
            None => AdbExecutor::default(),
        };
        println!("  Attached devices");
        match adb.list_devices() {
            Ok(devices) if devices.is_empty() => println!("   (none)"),
            Ok(devices) => {
                for d in devices {
                    let configured = transport.targets.contains(&d.serial);
                    println!(
                        "   {:<24} {:<14} {}",
                        d.serial,
                        d.state,
                        if configured { "configured" } else { "" },
                    );
                }
            }
            Err(e) => println!("   adb devices failed: {e}"),
        }
        println!();
    }

    // ── Targets ────────────────────────────────────────────────
    let executor = transport.create_executor();
    println!("  {:<24} {:>10} {:>10} {:>10}", "Target", "Reachable", "Temp C", "Headroom");
    println!("  {}", "-".repeat(58));

    let mut unreachable = 0;
    for target in transport.resolved_targets() {
        let reachable = executor.is_reachable(&target);
        if !reachable {
            unreachable += 1;
            println!("  {:<24} {:>10} {:>10} {:>10}", target, "no", "-", "-");
            continue;
        }
        match ThermalInfo::read_remote(executor.as_ref(), &target) {
            Ok(t) => {
                println!(
                    "  {:<24} {:>10} {:>10.1} {:>10.1}  {}",
                    target,
                    "yes",
                    t.cpu_temp_celsius,
                    t.headroom_celsius(),
                    temp_bar(t.cpu_temp_celsius as f64),
                );
                if t.is_overheating() {
                    println!("   WARNING: {target} is at its throttling threshold; raise policy.cooldown_secs");
                }
            }
            Err(e) => {
                tracing::debug!("thermal read on '{target}' failed: {e}");
                println!("  {:<24} {:>10} {:>10} {:>10}", target, "yes", "n/a", "-");
            }
        }
    }
    println!();

    if unreachable > 0 {
        anyhow::bail!("{unreachable} target(s) unreachable via {}", executor.name());
    }
    Ok(())
}

/// Creates a visual temperature bar (0-100 C scale).
fn temp_bar(celsius: f64) -> String {
    let filled = ((celsius / 100.0) * 20.0).round().max(0.0) as usize;
    let filled = filled.min(20);
    let empty = 20 - filled;
    let symbol = if celsius >= 80.0 {
        "#"
    } else if celsius >= 60.0 {
        "="
    } else {
        "-"
    };
    format!("[{}{}]", symbol.repeat(filled), ".".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_bar() {
        assert_eq!(temp_bar(50.0), "[----------..........]");
        assert_eq!(temp_bar(85.0), "[#################...]");
        assert_eq!(temp_bar(-5.0), "[....................]");
    }
}
