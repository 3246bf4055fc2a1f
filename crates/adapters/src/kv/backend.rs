// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store selection from configured endpoints

use super::{EtcdConfig, EtcdKeysAdapter, FileKvStore, KvEntry, KvError, KvStore, TlsFiles};
use async_trait::async_trait;
use rebootlock_core::Version;

/// Store picked at startup from the endpoint list
#[derive(Clone)]
pub enum KvBackend {
    Etcd(EtcdKeysAdapter),
    File(FileKvStore),
}

impl KvBackend {
    /// A lone `file://` endpoint selects the file store, anything else is etcd
    pub fn connect(endpoints: &[String], tls: TlsFiles) -> Result<Self, KvError> {
        if let [only] = endpoints {
            if let Some(store) = FileKvStore::from_endpoint(only) {
                return Ok(KvBackend::File(store));
            }
        }
        if endpoints.iter().any(|e| e.starts_with("file://")) {
            return Err(KvError::Other(
                "a file:// endpoint cannot be combined with other endpoints".to_string(),
            ));
        }

        let config = EtcdConfig {
            endpoints: endpoints.to_vec(),
            tls,
            ..EtcdConfig::default()
        };
        EtcdKeysAdapter::new(config).map(KvBackend::Etcd)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            KvBackend::Etcd(_) => "etcd",
            KvBackend::File(_) => "file",
        }
    }
}

#[async_trait]
impl KvStore for KvBackend {
    async fn get(&self, key: &str) -> Result<KvEntry, KvError> {
        match self {
            KvBackend::Etcd(store) => store.get(key).await,
            KvBackend::File(store) => store.get(key).await,
        }
    }

    async fn create(&self, key: &str, value: &str) -> Result<Version, KvError> {
        match self {
            KvBackend::Etcd(store) => store.create(key, value).await,
            KvBackend::File(store) => store.create(key, value).await,
        }
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        value: &str,
        expected: Version,
    ) -> Result<Version, KvError> {
        match self {
            KvBackend::Etcd(store) => store.compare_and_swap(key, value, expected).await,
            KvBackend::File(store) => store.compare_and_swap(key, value, expected).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn file_endpoint_selects_file_store() {
        let backend =
            KvBackend::connect(&endpoints(&["file:///tmp/rebootlock.json"]), TlsFiles::default())
                .unwrap();
        assert_eq!(backend.kind(), "file");
    }

    #[test]
    fn http_endpoints_select_etcd() {
        let backend = KvBackend::connect(
            &endpoints(&["http://10.0.0.1:2379/", "http://10.0.0.2:2379"]),
            TlsFiles::default(),
        )
        .unwrap();
        assert_eq!(backend.kind(), "etcd");
        match backend {
            KvBackend::Etcd(store) => assert_eq!(
                store.endpoints(),
                ["http://10.0.0.1:2379", "http://10.0.0.2:2379"]
            ),
            KvBackend::File(_) => panic!("expected etcd"),
        }
    }

    #[test]
    fn mixed_file_and_http_is_rejected() {
        let result = KvBackend::connect(
            &endpoints(&["file:///tmp/a.json", "http://10.0.0.1:2379"]),
            TlsFiles::default(),
        );
        assert!(result.is_err());
    }
}
