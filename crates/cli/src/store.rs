// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store connection flags shared by every command

use anyhow::{Context, Result};
use rebootlock_adapters::{
    KvBackend, MachineIdFile, MachineIdentity, TlsFiles, TracedKvStore, DEFAULT_ENDPOINTS,
    DEFAULT_MACHINE_ID_PATH,
};
use rebootlock_engine::{KvLockClient, Lock};
use std::path::PathBuf;

pub type CliLock = Lock<KvLockClient<TracedKvStore<KvBackend>>>;

#[derive(clap::Args, Debug, Clone)]
pub struct StoreArgs {
    /// Store endpoint; repeat or comma-separate for several (file://PATH for a local store)
    #[arg(
        long = "endpoint",
        global = true,
        env = "REBOOTLOCKCTL_ENDPOINT",
        value_delimiter = ','
    )]
    pub endpoints: Vec<String>,

    /// etcd CA file
    #[arg(long, global = true, env = "REBOOTLOCKCTL_ETCD_CAFILE")]
    pub etcd_cafile: Option<PathBuf>,

    /// etcd client certificate file
    #[arg(long, global = true, env = "REBOOTLOCKCTL_ETCD_CERTFILE")]
    pub etcd_certfile: Option<PathBuf>,

    /// etcd client key file
    #[arg(long, global = true, env = "REBOOTLOCKCTL_ETCD_KEYFILE")]
    pub etcd_keyfile: Option<PathBuf>,

    /// Reboot group
    #[arg(long, global = true, env = "REBOOTLOCKCTL_GROUP")]
    pub group: Option<String>,

    /// File holding this machine's id [default: /etc/machine-id]
    #[arg(long, global = true, env = "REBOOTLOCKCTL_MACHINE_ID_FILE")]
    pub machine_id_file: Option<PathBuf>,
}

impl StoreArgs {
    /// Endpoints given on the command line, blanks dropped
    pub fn configured_endpoints(&self) -> Vec<String> {
        self.endpoints
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect()
    }

    pub fn tls(&self) -> TlsFiles {
        TlsFiles {
            ca_file: self.etcd_cafile.clone(),
            cert_file: self.etcd_certfile.clone(),
            key_file: self.etcd_keyfile.clone(),
        }
    }

    /// `explicit` if given, otherwise this machine's id
    pub fn holder_id(&self, explicit: Option<String>) -> Result<String> {
        if let Some(id) = explicit.filter(|id| !id.is_empty()) {
            return Ok(id);
        }
        let path = self
            .machine_id_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MACHINE_ID_PATH));
        MachineIdFile::new(&path)
            .machine_id()
            .with_context(|| format!("cannot read machine id from {}", path.display()))
    }

    /// Connect to the store and open the group's semaphore as `holder`
    pub async fn open_lock(&self, holder: &str) -> Result<CliLock> {
        let mut endpoints = self.configured_endpoints();
        if endpoints.is_empty() {
            endpoints = DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect();
        }

        let backend =
            KvBackend::connect(&endpoints, self.tls()).context("error setting up store client")?;
        let group = self.group.as_deref().unwrap_or_default();
        let client = KvLockClient::new(TracedKvStore::new(backend), group)
            .await
            .context("error initializing reboot lock")?;
        Ok(Lock::new(holder, client))
    }
}
