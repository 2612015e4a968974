//! Integration tests for the path from a pull response to the stored text.
//!
//! These tests go through the public API only: decode a response body, build
//! the replacement [`ConfigStore`], render it, and read it back the way the
//! file adapter does on the next start.

use config_sync_core::{decode_pull_response, ConfigStore, ConfigVersion, PullReply};

fn decode_update(body: &str) -> ConfigStore {
    match decode_pull_response(body).expect("decode must succeed") {
        PullReply::Update(update) => {
            ConfigStore::from_update(&update.entries, &update.version).expect("storable update")
        }
        other => panic!("expected an update, got {other:?}"),
    }
}

#[test]
fn test_timeout_update_is_readable_after_reload() {
    // Arrange
    let body = r#"{"code":2,"data":{"config":[{"key":"timeout","value":"30"}],"version":"5"}}"#;

    // Act
    let text = decode_update(body).render();
    let reloaded = ConfigStore::parse(&text).expect("reload");

    // Assert
    assert_eq!(reloaded.get("timeout"), Some("30"));
    assert_eq!(reloaded.version(), ConfigVersion::new("5"));
}

#[test]
fn test_same_bundle_renders_identically_regardless_of_entry_order() {
    // The endpoint may reorder entries between two pulls of the same version;
    // the stored text must not change.
    let first = decode_update(
        r#"{"code":2,"data":{"config":[{"key":"a","value":"1"},{"key":"b","value":"2"}],"version":"3"}}"#,
    );
    let second = decode_update(
        r#"{"code":2,"data":{"config":[{"key":"b","value":"2"},{"key":"a","value":"1"}],"version":3}}"#,
    );

    assert_eq!(first.render(), second.render());
}

#[test]
fn test_store_without_version_line_reports_initial_version() {
    let store = ConfigStore::parse("a=1\nb=2\n").expect("parse");

    assert_eq!(store.version().as_str(), "0");
    assert!(store.version().matches("0"));
}

#[test]
fn test_no_update_reply_carries_code() {
    let reply = decode_pull_response(r#"{"code":3,"data":{"config":[],"version":"9"}}"#)
        .expect("decode");

    assert_eq!(reply, PullReply::NoUpdate { code: 3 });
}
