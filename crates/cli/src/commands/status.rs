// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! status

use anyhow::{Context, Result};
use clap::Args;
use rebootlock_core::Semaphore;
use serde::Serialize;
use std::fmt;

use crate::output::{self, OutputFormat};
use crate::store::StoreArgs;

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[arg(long, short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
}

/// Semaphore as shown to operators
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StatusReport(pub Semaphore);

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Available: {}", self.0.available)?;
        writeln!(f, "Max: {}", self.0.capacity)?;
        if !self.0.holders.is_empty() {
            writeln!(f)?;
            writeln!(f, "MACHINE ID")?;
            for holder in &self.0.holders {
                writeln!(f, "{}", holder)?;
            }
        }
        Ok(())
    }
}

pub async fn status(store: &StoreArgs, args: StatusArgs) -> Result<()> {
    let lock = store.open_lock("").await?;
    let sem = lock.get().await.context("error retrieving semaphore")?;
    output::print(&StatusReport(sem), args.output);
    Ok(())
}
