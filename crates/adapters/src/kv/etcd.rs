// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! etcd v2 keys API adapter

use super::{KvEntry, KvError, KvStore};
use async_trait::async_trait;
use rebootlock_core::Version;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use ureq::tls::{Certificate, ClientCert, PrivateKey, RootCerts, TlsConfig};

const ERROR_KEY_NOT_FOUND: u64 = 100;
const ERROR_TEST_FAILED: u64 = 101;
const ERROR_NODE_EXIST: u64 = 105;

/// Endpoints tried when none are configured
pub const DEFAULT_ENDPOINTS: &[&str] = &["http://127.0.0.1:2379", "http://127.0.0.1:4001"];

/// TLS material for talking to etcd
#[derive(Debug, Clone, Default)]
pub struct TlsFiles {
    pub ca_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
}

impl TlsFiles {
    pub fn is_empty(&self) -> bool {
        self.ca_file.is_none() && self.cert_file.is_none() && self.key_file.is_none()
    }
}

/// etcd connection settings
#[derive(Debug, Clone)]
pub struct EtcdConfig {
    pub endpoints: Vec<String>,
    pub tls: TlsFiles,
    pub timeout: Duration,
}

impl Default for EtcdConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            tls: TlsFiles::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeResponse {
    node: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    #[serde(default)]
    value: String,
    modified_index: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error_code: u64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    cause: String,
}

enum Write {
    Create,
    Swap(Version),
}

/// Key-value store backed by the etcd v2 HTTP keys API
///
/// Calls block on the HTTP round trip, so each one runs on tokio's blocking
/// pool. Endpoints are tried in order until one answers.
#[derive(Clone)]
pub struct EtcdKeysAdapter {
    agent: ureq::Agent,
    endpoints: Arc<Vec<String>>,
}

impl EtcdKeysAdapter {
    pub fn new(config: EtcdConfig) -> Result<Self, KvError> {
        if config.endpoints.is_empty() {
            return Err(KvError::Other("no etcd endpoints configured".to_string()));
        }

        let mut builder = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout));
        if !config.tls.is_empty() {
            builder = builder.tls_config(load_tls(&config.tls)?);
        }

        Ok(Self {
            agent: ureq::Agent::new_with_config(builder.build()),
            endpoints: Arc::new(
                config
                    .endpoints
                    .iter()
                    .map(|e| e.trim_end_matches('/').to_string())
                    .collect(),
            ),
        })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    fn url(endpoint: &str, key: &str) -> String {
        format!("{}/v2/keys/{}", endpoint, escape_key_path(key))
    }

    fn get_blocking(&self, key: &str) -> Result<KvEntry, KvError> {
        self.each_endpoint(key, |url| self.agent.get(url).call())
    }

    fn put_blocking(&self, key: &str, value: &str, write: Write) -> Result<KvEntry, KvError> {
        self.each_endpoint(key, |url| {
            let request = self.agent.put(url);
            let request = match &write {
                Write::Create => request.query("prevExist", "false"),
                Write::Swap(version) => request.query("prevIndex", version.0.to_string()),
            };
            request.send_form([("value", value)])
        })
    }

    fn each_endpoint<F>(&self, key: &str, send: F) -> Result<KvEntry, KvError>
    where
        F: Fn(&str) -> Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    {
        let mut failures = Vec::new();
        for endpoint in self.endpoints.iter() {
            match send(&Self::url(endpoint, key)) {
                Ok(response) => return decode_response(key, response),
                Err(e) => {
                    tracing::debug!(endpoint, error = %e, "etcd endpoint failed");
                    failures.push(format!("{}: {}", endpoint, e));
                }
            }
        }
        Err(KvError::Unavailable(failures.join("; ")))
    }
}

#[async_trait]
impl KvStore for EtcdKeysAdapter {
    async fn get(&self, key: &str) -> Result<KvEntry, KvError> {
        let this = self.clone();
        let key = key.to_string();
        spawn_blocking(move || this.get_blocking(&key)).await
    }

    async fn create(&self, key: &str, value: &str) -> Result<Version, KvError> {
        let this = self.clone();
        let (key, value) = (key.to_string(), value.to_string());
        spawn_blocking(move || this.put_blocking(&key, &value, Write::Create))
            .await
            .map(|entry| entry.version)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        value: &str,
        expected: Version,
    ) -> Result<Version, KvError> {
        let this = self.clone();
        let (key, value) = (key.to_string(), value.to_string());
        spawn_blocking(move || this.put_blocking(&key, &value, Write::Swap(expected)))
            .await
            .map_err(|e| match e {
                KvError::VersionConflict { key, .. } => KvError::VersionConflict { key, expected },
                other => other,
            })
            .map(|entry| entry.version)
    }
}

async fn spawn_blocking<T, F>(f: F) -> Result<T, KvError>
where
    F: FnOnce() -> Result<T, KvError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| KvError::Other(format!("etcd request task failed: {}", e)))?
}

fn decode_response(
    key: &str,
    mut response: ureq::http::Response<ureq::Body>,
) -> Result<KvEntry, KvError> {
    let status = response.status();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| KvError::Unavailable(format!("failed to read response: {}", e)))?;

    if status.is_success() {
        let parsed: NodeResponse = serde_json::from_str(&body)
            .map_err(|e| KvError::Other(format!("malformed etcd response: {}", e)))?;
        return Ok(KvEntry {
            value: parsed.node.value,
            version: Version(parsed.node.modified_index),
        });
    }

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => Err(map_etcd_error(key, err)),
        Err(_) => Err(KvError::Other(format!(
            "etcd returned HTTP {}: {}",
            status.as_u16(),
            body.trim()
        ))),
    }
}

fn map_etcd_error(key: &str, err: ErrorResponse) -> KvError {
    match err.error_code {
        ERROR_KEY_NOT_FOUND => KvError::NotFound(key.to_string()),
        ERROR_NODE_EXIST => KvError::AlreadyExists(key.to_string()),
        // Expected version is filled in by the caller
        ERROR_TEST_FAILED => KvError::VersionConflict {
            key: key.to_string(),
            expected: Version(0),
        },
        code => KvError::Other(format!("etcd error {}: {} ({})", code, err.message, err.cause)),
    }
}

fn load_tls(files: &TlsFiles) -> Result<TlsConfig, KvError> {
    let mut builder = TlsConfig::builder();

    if let Some(ca_file) = &files.ca_file {
        let pem = std::fs::read(ca_file)?;
        let ca = Certificate::from_pem(&pem)
            .map_err(|e| KvError::Other(format!("invalid CA file {}: {}", ca_file.display(), e)))?;
        builder = builder.root_certs(RootCerts::new_with_certs(&[ca]));
    }

    match (&files.cert_file, &files.key_file) {
        (Some(cert_file), Some(key_file)) => {
            let cert_pem = std::fs::read(cert_file)?;
            let key_pem = std::fs::read(key_file)?;
            let cert = Certificate::from_pem(&cert_pem).map_err(|e| {
                KvError::Other(format!("invalid cert file {}: {}", cert_file.display(), e))
            })?;
            let key = PrivateKey::from_pem(&key_pem).map_err(|e| {
                KvError::Other(format!("invalid key file {}: {}", key_file.display(), e))
            })?;
            builder = builder.client_cert(Some(ClientCert::new_with_certs(&[cert], key)));
        }
        (None, None) => {}
        _ => {
            return Err(KvError::Other(
                "etcd cert file and key file must be given together".to_string(),
            ))
        }
    }

    Ok(builder.build())
}

/// Escape a key for use as a URL path, keeping `/` separators
fn escape_key_path(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
#[path = "etcd_tests.rs"]
mod tests;
