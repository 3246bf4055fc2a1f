// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run the reboot coordinator in the foreground
//!
//! Same as `rebootlockd`, except that store flags given to `rebootlockctl`
//! take precedence over the daemon's environment.

use anyhow::Result;
use rebootlock_daemon::{run, setup_logging, Config, COORDINATOR_NAME};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::store::StoreArgs;

/// Daemon configuration from the environment, overridden by `store`
pub fn config(store: &StoreArgs) -> Result<Config> {
    let mut config = Config::from_env()?;
    apply_store_args(&mut config, store);
    Ok(config)
}

pub(crate) fn apply_store_args(config: &mut Config, store: &StoreArgs) {
    config.set_endpoints(&store.configured_endpoints());

    let tls = store.tls();
    if !tls.is_empty() {
        config.tls = tls;
    }
    if let Some(group) = &store.group {
        config.group = group.clone();
    }
    if let Some(path) = &store.machine_id_file {
        config.machine_id_path = path.clone();
    }
}

pub async fn daemon(store: &StoreArgs) -> Result<()> {
    let config = config(store)?;
    let _log_guard = setup_logging(config.log_file.as_deref())?;
    info!("Starting {} (pid: {})", COORDINATOR_NAME, std::process::id());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        result = run(config) => {
            result?;
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

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
