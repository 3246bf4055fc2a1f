// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn key_path_escapes_percent_but_keeps_slashes() {
    assert_eq!(
        escape_key_path("coreos.com/updateengine/rebootlock/groups/prod%2Fdb/semaphore"),
        "coreos.com/updateengine/rebootlock/groups/prod%252Fdb/semaphore"
    );
}

#[test]
fn url_joins_endpoint_and_key() {
    assert_eq!(
        EtcdKeysAdapter::url("http://127.0.0.1:2379", "a/b c"),
        "http://127.0.0.1:2379/v2/keys/a/b%20c"
    );
}

#[test]
fn etcd_error_codes_map_to_kv_errors() {
    let err = |code| ErrorResponse {
        error_code: code,
        message: "msg".to_string(),
        cause: "cause".to_string(),
    };
    assert!(matches!(map_etcd_error("k", err(100)), KvError::NotFound(_)));
    assert!(matches!(
        map_etcd_error("k", err(101)),
        KvError::VersionConflict { .. }
    ));
    assert!(matches!(
        map_etcd_error("k", err(105)),
        KvError::AlreadyExists(_)
    ));
    assert!(matches!(map_etcd_error("k", err(300)), KvError::Other(_)));
}

#[test]
fn node_response_parses_modified_index() {
    let parsed: NodeResponse = serde_json::from_str(
        r#"{"action":"get","node":{"key":"/k","value":"{\"semaphore\":1}","modifiedIndex":1024,"createdIndex":7}}"#,
    )
    .unwrap();
    assert_eq!(parsed.node.modified_index, 1024);
    assert_eq!(parsed.node.value, r#"{"semaphore":1}"#);
}

#[test]
fn new_requires_endpoints() {
    let config = EtcdConfig {
        endpoints: Vec::new(),
        ..EtcdConfig::default()
    };
    assert!(EtcdKeysAdapter::new(config).is_err());
}

#[test]
fn cert_without_key_is_rejected() {
    let config = EtcdConfig {
        tls: TlsFiles {
            cert_file: Some(PathBuf::from("/nonexistent/cert.pem")),
            ..TlsFiles::default()
        },
        ..EtcdConfig::default()
    };
    assert!(EtcdKeysAdapter::new(config).is_err());
}

#[tokio::test]
async fn unreachable_endpoints_are_unavailable() {
    let adapter = EtcdKeysAdapter::new(EtcdConfig {
        endpoints: vec!["http://127.0.0.1:1".to_string()],
        timeout: Duration::from_secs(2),
        ..EtcdConfig::default()
    })
    .unwrap();

    let err = adapter.get("some/key").await.unwrap_err();
    assert!(matches!(err, KvError::Unavailable(_)), "got {:?}", err);
}
