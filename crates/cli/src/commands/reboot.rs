// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reboot: take the lock for this machine, then reboot it

use anyhow::{bail, Context, Result};
use nix::unistd::Uid;
use rebootlock_adapters::{RebootAdapter, SystemctlRebootAdapter, TracedRebootAdapter};

use crate::store::StoreArgs;

pub async fn reboot(store: &StoreArgs) -> Result<()> {
    if !Uid::effective().is_root() {
        bail!("must be root to reboot");
    }

    let id = store.holder_id(None)?;
    let lock = store.open_lock(&id).await?;
    lock.lock().await.context("error locking")?;

    TracedRebootAdapter::new(SystemctlRebootAdapter::new())
        .reboot()
        .await
        .context("error rebooting")?;
    Ok(())
}
