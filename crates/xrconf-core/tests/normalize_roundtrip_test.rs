//! Re-serialization stability: a document that makes the trip
//! parse → serialize → parse must normalize to the same canonical tree as
//! its original wire form, whatever the serializer did to key order,
//! whitespace, or namespace prefixes.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use xrconf_api::netconf::reply::RpcReply;
use xrconf_core::{from_json_str, from_xml_str};

const JSON_DOC: &str = r#"{
  "Cisco-IOS-XR-infra-rsi-cfg:vrfs": {
    "vrf": [
      {"vrf-name": "BLUE", "create": [null], "delete": "delete"},
      {"vrf-name": "GREEN", "description": "staging", "mtu": 9000}
    ]
  }
}"#;

#[test]
fn json_reserialization_normalizes_to_the_same_tree() {
    let value: serde_json::Value = serde_json::from_str(JSON_DOC).unwrap();
    // serde_json reorders object keys; canonical maps compare by key, so
    // the trees must still be equal.
    let reserialized = serde_json::to_string(&value).unwrap();
    assert_eq!(
        from_json_str(JSON_DOC).unwrap(),
        from_json_str(&reserialized).unwrap()
    );
}

#[test]
fn json_pretty_printing_normalizes_to_the_same_tree() {
    let value: serde_json::Value = serde_json::from_str(JSON_DOC).unwrap();
    let pretty = serde_json::to_string_pretty(&value).unwrap();
    assert_eq!(
        from_json_str(JSON_DOC).unwrap(),
        from_json_str(&pretty).unwrap()
    );
}

#[test]
fn reply_serialization_normalizes_to_the_wire_tree() {
    // The subtree as a device sends it inside an rpc-reply, including a
    // namespaced delete marker.
    let inner = "<vrfs xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\" \
         xmlns:xc=\"urn:ietf:params:xml:ns:netconf:base:1.0\">\
         <vrf xc:operation=\"delete\"><vrf-name>BLUE</vrf-name><create/></vrf>\
         <vrf><vrf-name>GREEN</vrf-name><description>staging</description></vrf>\
         </vrfs>";
    let reply_doc = format!(
        "<rpc-reply message-id=\"1\" \
         xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\"><data>{inner}</data></rpc-reply>"
    );

    let reply = RpcReply::parse(reply_doc).unwrap();
    let reserialized = reply.data_as_string().unwrap();

    let original = from_xml_str(inner).unwrap();
    let roundtripped = from_xml_str(&reserialized).unwrap();
    assert_eq!(original, roundtripped);
}
