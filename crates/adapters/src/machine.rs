// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local machine identity

use std::path::{Path, PathBuf};

pub const DEFAULT_MACHINE_ID_PATH: &str = "/etc/machine-id";

/// Source of the id this machine holds the lock under
pub trait MachineIdentity: Clone + Send + Sync + 'static {
    /// The machine id, or `None` when it cannot be determined
    fn machine_id(&self) -> Option<String>;
}

/// Reads the id from a machine-id file
#[derive(Debug, Clone)]
pub struct MachineIdFile {
    path: PathBuf,
}

impl Default for MachineIdFile {
    fn default() -> Self {
        Self::new(DEFAULT_MACHINE_ID_PATH)
    }
}

impl MachineIdFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MachineIdentity for MachineIdFile {
    fn machine_id(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                (!id.is_empty()).then(|| id.to_string())
            }
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "cannot read machine id");
                None
            }
        }
    }
}
