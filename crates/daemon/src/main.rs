// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reboot lock daemon (rebootlockd)
//!
//! Waits for a reboot to be needed, takes the cluster reboot lock and
//! reboots the machine.

use rebootlock_daemon::{run, setup_logging, Config, COORDINATOR_NAME};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let log_guard = setup_logging(config.log_file.as_deref())?;
    info!("Starting {} (pid: {})", COORDINATOR_NAME, std::process::id());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        result = run(config) => {
            if let Err(e) = result {
                error!("{} failed: {}", COORDINATOR_NAME, e);
                drop(log_guard);
                return Err(e.into());
            }
            info!("Rebooting is disabled, exiting");
        }

        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
        }

        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down...");
        }
    }

    Ok(())
}
