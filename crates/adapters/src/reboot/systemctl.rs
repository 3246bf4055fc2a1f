// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! systemd reboot adapter

use super::{RebootAdapter, RebootError};
use async_trait::async_trait;
use tokio::process::Command;

/// Reboots through `systemctl reboot`
#[derive(Clone, Debug)]
pub struct SystemctlRebootAdapter {
    program: String,
}

impl Default for SystemctlRebootAdapter {
    fn default() -> Self {
        Self {
            program: "systemctl".to_string(),
        }
    }
}

impl SystemctlRebootAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different `systemctl` binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl RebootAdapter for SystemctlRebootAdapter {
    async fn reboot(&self) -> Result<(), RebootError> {
        let output = Command::new(&self.program)
            .arg("reboot")
            .output()
            .await
            .map_err(|e| RebootError::CommandFailed(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RebootError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(())
    }
}
