// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration and startup

use std::path::PathBuf;

use rebootlock_adapters::{
    CoordinatorConfFile, KvBackend, KvError, MachineIdFile, MachineIdentity, RebootRequiredFile,
    StatusError, SystemctlRebootAdapter, TlsFiles, TracedKvStore, TracedRebootAdapter,
    DEFAULT_ENDPOINTS, DEFAULT_MACHINE_ID_PATH, DEFAULT_SENTINEL_PATH, DEFAULT_STATUS_PATH,
};
use rebootlock_core::{Periodic, Strategy, StrategyError, StrategyName, SystemClock, WindowError};
use rebootlock_engine::{
    Coordinator, CoordinatorConfig, CoordinatorDeps, CoordinatorError, KvLockClient, Lock,
    LockError,
};
use thiserror::Error;
use tracing::{info, warn};

/// Name written to the coordinator status file
pub const COORDINATOR_NAME: &str = "rebootlockd";

type DaemonLockClient = KvLockClient<TracedKvStore<KvBackend>>;

/// Coordinator with the daemon's concrete adapters
pub type DaemonCoordinator = Coordinator<
    DaemonLockClient,
    RebootRequiredFile,
    TracedRebootAdapter<SystemctlRebootAdapter>,
    CoordinatorConfFile,
    SystemClock,
>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Store endpoints, tried in order
    pub endpoints: Vec<String>,
    /// Whether endpoints were given explicitly rather than defaulted
    pub endpoints_configured: bool,
    pub tls: TlsFiles,
    /// Reboot group; empty for the default group
    pub group: String,
    pub strategy: StrategyName,
    pub window: Option<Periodic>,
    /// File whose presence means a reboot is needed
    pub sentinel_path: PathBuf,
    /// update-engine coordinator.conf
    pub status_path: PathBuf,
    pub machine_id_path: PathBuf,
    /// Log here instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            endpoints_configured: false,
            tls: TlsFiles::default(),
            group: String::new(),
            strategy: StrategyName::BestEffort,
            window: None,
            sentinel_path: PathBuf::from(DEFAULT_SENTINEL_PATH),
            status_path: PathBuf::from(DEFAULT_STATUS_PATH),
            machine_id_path: PathBuf::from(DEFAULT_MACHINE_ID_PATH),
            log_file: None,
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, LifecycleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LifecycleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(endpoints) = var("REBOOTLOCKD_ENDPOINT") {
            config.set_endpoints(&[endpoints]);
        }
        config.tls = TlsFiles {
            ca_file: var("REBOOTLOCKD_ETCD_CAFILE").map(PathBuf::from),
            cert_file: var("REBOOTLOCKD_ETCD_CERTFILE").map(PathBuf::from),
            key_file: var("REBOOTLOCKD_ETCD_KEYFILE").map(PathBuf::from),
        };
        if let Some(group) = var("REBOOTLOCKD_GROUP") {
            config.group = group;
        }

        config.strategy = var("REBOOT_STRATEGY").unwrap_or_default().parse()?;
        config.window = match (var("REBOOT_WINDOW_START"), var("REBOOT_WINDOW_LENGTH")) {
            (Some(start), Some(length)) => Some(Periodic::parse(&start, &length)?),
            (None, None) => None,
            _ => return Err(LifecycleError::IncompleteWindow),
        };

        if let Some(path) = var("REBOOTLOCKD_REBOOT_SENTINEL") {
            config.sentinel_path = PathBuf::from(path);
        }
        if let Some(path) = var("REBOOTLOCKD_STATUS_PATH") {
            config.status_path = PathBuf::from(path);
        }
        if let Some(path) = var("REBOOTLOCKD_MACHINE_ID_PATH") {
            config.machine_id_path = PathBuf::from(path);
        }
        config.log_file = var("REBOOTLOCKD_LOG_FILE").map(PathBuf::from);

        Ok(config)
    }

    /// Replace the endpoints; each value may hold a comma-separated list
    pub fn set_endpoints(&mut self, values: &[String]) {
        let endpoints: Vec<String> = values
            .iter()
            .flat_map(|v| v.split(','))
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if !endpoints.is_empty() {
            self.endpoints = endpoints;
            self.endpoints_configured = true;
        }
    }

    /// The strategy the daemon runs with
    pub fn resolved_strategy(&self) -> Strategy {
        self.strategy.resolve(self.endpoints_configured)
    }
}

/// Errors that stop the daemon
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid REBOOT_STRATEGY: {0}")]
    Strategy(#[from] StrategyError),

    #[error("invalid reboot window: {0}")]
    Window(#[from] WindowError),

    #[error("REBOOT_WINDOW_START and REBOOT_WINDOW_LENGTH must be set together")]
    IncompleteWindow,

    #[error("cannot read machine id from {0}")]
    NoMachineId(PathBuf),

    #[error("invalid log file path: {0}")]
    InvalidLogFile(PathBuf),

    #[error("store error: {0}")]
    Store(#[from] KvError),

    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    #[error("status file error: {0}")]
    Status(#[from] StatusError),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the coordinator until the machine reboots
///
/// Returns `Ok` only when rebooting is disabled.
pub async fn run(config: Config) -> Result<(), LifecycleError> {
    build(&config).await?.run().await?;
    Ok(())
}

async fn build(config: &Config) -> Result<DaemonCoordinator, LifecycleError> {
    let strategy = config.resolved_strategy();
    if config.strategy.is_deprecated() {
        warn!(
            resolved = %strategy,
            "the best-effort strategy is deprecated, set REBOOT_STRATEGY to reboot or etcd-lock"
        );
    }

    let state = CoordinatorConfFile::open(&config.status_path, COORDINATOR_NAME, strategy.as_str())?;
    info!(
        %strategy,
        group = %config.group,
        status_path = %config.status_path.display(),
        "starting {}",
        COORDINATOR_NAME
    );

    let lock = if strategy.uses_lock() {
        Some(connect_lock(config).await?)
    } else {
        None
    };

    let mut coordinator_config = CoordinatorConfig::new(strategy);
    coordinator_config.window = config.window.clone();
    if let Some(window) = &coordinator_config.window {
        info!(%window, "reboots limited to window");
    }

    let deps = CoordinatorDeps {
        lock,
        signal: RebootRequiredFile::new(&config.sentinel_path),
        reboot: TracedRebootAdapter::new(SystemctlRebootAdapter::new()),
        state,
        clock: SystemClock,
    };
    Ok(Coordinator::new(deps, coordinator_config)?)
}

/// Build this machine's lock without touching the store
///
/// The coordinator creates the semaphore on its first lock operation, so an
/// unreachable store does not hold up startup.
async fn connect_lock(config: &Config) -> Result<Lock<DaemonLockClient>, LifecycleError> {
    let id = MachineIdFile::new(&config.machine_id_path)
        .machine_id()
        .ok_or_else(|| LifecycleError::NoMachineId(config.machine_id_path.clone()))?;

    let store = KvBackend::connect(&config.endpoints, config.tls.clone())?;
    info!(backend = store.kind(), endpoints = ?config.endpoints, "using lock store");
    let client = KvLockClient::without_init(TracedKvStore::new(store), &config.group);
    Ok(Lock::new(id, client))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
