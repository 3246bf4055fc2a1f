// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lock / unlock

use anyhow::{Context, Result};
use clap::Args;

use crate::store::StoreArgs;

#[derive(Args, Debug)]
pub struct LockArgs {
    /// Holder id (defaults to this machine's id)
    pub id: Option<String>,
}

pub async fn lock(store: &StoreArgs, args: LockArgs) -> Result<()> {
    let id = store.holder_id(args.id)?;
    let lock = store.open_lock(&id).await?;
    lock.lock().await.context("error locking")?;
    Ok(())
}

pub async fn unlock(store: &StoreArgs, args: LockArgs) -> Result<()> {
    let id = store.holder_id(args.id)?;
    let lock = store.open_lock(&id).await?;
    lock.unlock().await.context("error unlocking")?;
    Ok(())
}
