// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! set-max

use anyhow::{Context, Result};
use clap::Args;

use crate::store::StoreArgs;

#[derive(Args, Debug)]
pub struct SetMaxArgs {
    /// Number of machines allowed to reboot at once
    #[arg(allow_negative_numbers = true)]
    pub max: i64,
}

pub async fn set_max(store: &StoreArgs, args: SetMaxArgs) -> Result<()> {
    // The holder id plays no part in a capacity change.
    let lock = store.open_lock("").await?;
    let (sem, old) = lock
        .set_capacity(args.max)
        .await
        .context("error setting semaphore max")?;

    println!("Old-Max: {}", old);
    println!("Max: {}", sem.capacity);
    Ok(())
}
