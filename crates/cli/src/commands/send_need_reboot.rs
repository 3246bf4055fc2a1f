// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! send-need-reboot

use anyhow::{Context, Result};
use clap::Args;
use rebootlock_adapters::{RebootRequiredFile, DEFAULT_SENTINEL_PATH};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SendNeedRebootArgs {
    /// File whose presence tells the daemon a reboot is needed
    #[arg(
        long,
        env = "REBOOTLOCKCTL_REBOOT_SENTINEL",
        default_value = DEFAULT_SENTINEL_PATH
    )]
    pub sentinel: PathBuf,
}

pub async fn send_need_reboot(args: SendNeedRebootArgs) -> Result<()> {
    RebootRequiredFile::new(&args.sentinel)
        .request_reboot()
        .await
        .with_context(|| format!("error writing {}", args.sentinel.display()))?;
    Ok(())
}
