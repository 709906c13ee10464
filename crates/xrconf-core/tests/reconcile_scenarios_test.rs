//! Reconciliation scenarios mirroring real device workflows: the documents
//! an operator writes against the documents a device returns.
#![allow(clippy::unwrap_used)]

use xrconf_core::{insync_for_merge_json, insync_for_merge_xml, insync_for_replace_json};

// What an operator asks for: two VRFs, created via the [null] sentinel.
const TARGET: &str = r#"{
  "Cisco-IOS-XR-infra-rsi-cfg:vrfs": {
    "vrf": [
      {"vrf-name": "BLUE", "create": [null]},
      {"vrf-name": "GREEN", "create": [null], "description": "staging"}
    ]
  }
}"#;

// What the device reports back after applying it: same data, different
// order, plus state the operator never specified.
const CURRENT: &str = r#"{
  "Cisco-IOS-XR-infra-rsi-cfg:vrfs": {
    "vrf": [
      {"vrf-name": "GREEN", "create": [null], "description": "staging"},
      {"vrf-name": "BLUE", "create": [null]},
      {"vrf-name": "MGMT", "create": [null]}
    ]
  }
}"#;

#[test]
fn applied_config_reads_back_insync_for_merge() {
    assert!(insync_for_merge_json(TARGET, CURRENT).unwrap());
}

#[test]
fn device_extras_break_replace_sync() {
    assert!(!insync_for_replace_json(TARGET, CURRENT).unwrap());
}

#[test]
fn reapplying_the_device_snapshot_is_idempotent() {
    assert!(insync_for_merge_json(CURRENT, CURRENT).unwrap());
    assert!(insync_for_replace_json(CURRENT, CURRENT).unwrap());
}

#[test]
fn fresh_device_needs_the_config() {
    assert!(!insync_for_merge_json(TARGET, "").unwrap());
    assert!(!insync_for_merge_json(TARGET, "{}").unwrap());
}

#[test]
fn cleanup_manifest_is_insync_once_vrfs_are_gone() {
    let cleanup = r#"{
      "Cisco-IOS-XR-infra-rsi-cfg:vrfs": {
        "vrf": [
          {"vrf-name": "BLUE", "delete": "delete"},
          {"vrf-name": "GREEN", "delete": "delete"}
        ]
      }
    }"#;
    let emptied = r#"{"Cisco-IOS-XR-infra-rsi-cfg:vrfs": {"vrf": []}}"#;
    assert!(insync_for_merge_json(cleanup, emptied).unwrap());
    assert!(!insync_for_merge_json(cleanup, CURRENT).unwrap());
}

#[test]
fn netconf_documents_reconcile_like_json() {
    let target = "<vrfs xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\">\
         <vrf><vrf-name>BLUE</vrf-name><create/></vrf></vrfs>";
    let current = "<vrfs xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\">\n\
         \x20 <vrf>\n    <vrf-name>BLUE</vrf-name>\n    <create/>\n  </vrf>\n\
         \x20 <vrf>\n    <vrf-name>MGMT</vrf-name>\n    <create/>\n  </vrf>\n</vrfs>";
    assert!(insync_for_merge_xml(target, current).unwrap());
    assert!(!insync_for_merge_xml(current, target).unwrap());
}
