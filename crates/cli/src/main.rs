// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rebootlockctl - manage the cluster reboot lock

mod commands;
mod output;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{daemon, lock, reboot, send_need_reboot, set_max, status};
use tracing_subscriber::EnvFilter;

use crate::store::StoreArgs;

#[derive(Parser)]
#[command(
    name = "rebootlockctl",
    version,
    about = "Manage the cluster reboot lock"
)]
struct Cli {
    /// Print debug information to stderr
    #[arg(long, global = true, env = "REBOOTLOCKCTL_DEBUG")]
    debug: bool,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a reboot slot for this machine (or the given id)
    Lock(lock::LockArgs),
    /// Release the reboot slot held by this machine (or the given id)
    Unlock(lock::LockArgs),
    /// Set how many machines may reboot at once
    SetMax(set_max::SetMaxArgs),
    /// Show the semaphore and its holders
    Status(status::StatusArgs),
    /// Take a reboot slot, then reboot this machine
    Reboot,
    /// Tell the local daemon that a reboot is needed
    SendNeedReboot(send_need_reboot::SendNeedRebootArgs),
    /// Run the reboot coordinator in the foreground
    Daemon,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The daemon installs its own subscriber
    if let Commands::Daemon = cli.command {
        return daemon::daemon(&cli.store).await;
    }

    let filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Lock(args) => lock::lock(&cli.store, args).await,
        Commands::Unlock(args) => lock::unlock(&cli.store, args).await,
        Commands::SetMax(args) => set_max::set_max(&cli.store, args).await,
        Commands::Status(args) => status::status(&cli.store, args).await,
        Commands::Reboot => reboot::reboot(&cli.store).await,
        Commands::SendNeedReboot(args) => send_need_reboot::send_need_reboot(args).await,
        Commands::Daemon => unreachable!(),
    }
}
