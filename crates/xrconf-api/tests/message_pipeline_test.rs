//! End-to-end tests for the NETCONF message pipeline: request formatting,
//! chunked framing, and reply parsing, exercised without a device.
#![allow(clippy::unwrap_used)]

use xrconf_api::netconf::format;
use xrconf_api::netconf::framer::{ChunkFramer, Framer, FramerStatus, HelloFramer};
use xrconf_api::netconf::reply::RpcReply;

const SERVER_HELLO: &str = concat!(
    "<hello xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\">",
    "<capabilities>",
    "<capability>urn:ietf:params:netconf:base:1.1</capability>",
    "<capability>urn:ietf:params:netconf:capability:candidate:1.0</capability>",
    "</capabilities>",
    "<session-id>42</session-id>",
    "</hello>",
);

#[test]
fn hello_exchange_parses_under_fragmented_reads() {
    let mut wire = SERVER_HELLO.as_bytes().to_vec();
    wire.extend_from_slice(b"]]>]]>");

    let mut framer = HelloFramer::new();
    let mut last = FramerStatus::Continue;
    for fragment in wire.chunks(7) {
        last = framer.feed(fragment).unwrap();
        if last == FramerStatus::Stop {
            break;
        }
    }
    assert_eq!(last, FramerStatus::Stop);
    assert_eq!(framer.message(), SERVER_HELLO.as_bytes());
}

#[test]
fn framed_request_round_trips_through_the_chunk_framer() {
    // A request framed by the formatter must parse back through the framer
    // exactly, since both sides implement the same framing.
    let request = format::edit_config(
        5,
        "merge",
        "candidate",
        "<vrfs xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\"/>",
    );

    // The framer starts scanning at LF HASH; the formatter begins with the
    // hash because the previous message's trailing LF precedes it on the
    // wire. Prepend the LF the transport would have delivered.
    let mut wire = b"\n".to_vec();
    wire.extend_from_slice(request.as_bytes());

    let mut framer = ChunkFramer::new();
    let status = framer.feed(&wire).unwrap();
    assert_eq!(status, FramerStatus::Stop);

    let body = String::from_utf8(framer.into_message()).unwrap();
    assert!(body.contains("message-id=\"5\""));
    assert!(body.contains("<target><candidate/></target>"));
}

#[test]
fn chunked_reply_parses_into_data_payload() {
    let reply_doc = "<rpc-reply message-id=\"3\" \
         xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\"><data>\
         <interfaces xmlns=\"http://example.com/ns/if\">\
         <interface><name>GigabitEthernet0/0/0/0</name></interface>\
         </interfaces></data></rpc-reply>";

    // Split the document across two chunks, as the agent does for large
    // replies.
    let (a, b) = reply_doc.as_bytes().split_at(40);
    let mut wire = Vec::new();
    wire.extend_from_slice(format!("\n#{}\n", a.len()).as_bytes());
    wire.extend_from_slice(a);
    wire.extend_from_slice(format!("\n#{}\n", b.len()).as_bytes());
    wire.extend_from_slice(b);
    wire.extend_from_slice(b"\n##\n");

    let mut framer = ChunkFramer::new();
    let mut status = FramerStatus::Continue;
    for fragment in wire.chunks(11) {
        status = framer.feed(fragment).unwrap();
    }
    assert_eq!(status, FramerStatus::Stop);

    let reply = RpcReply::parse(String::from_utf8(framer.into_message()).unwrap()).unwrap();
    assert!(!reply.has_errors());
    let data = reply.data_as_string().unwrap();
    assert!(data.contains("<name>GigabitEthernet0/0/0/0</name>"));
    assert!(data.starts_with("<interfaces xmlns=\"http://example.com/ns/if\">"));
}

#[test]
fn error_reply_surfaces_all_error_fields() {
    let reply_doc = "<rpc-reply message-id=\"9\" \
         xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\">\
         <rpc-error><error-type>application</error-type>\
         <error-tag>operation-failed</error-tag>\
         <error-message>config failed</error-message></rpc-error>\
         </rpc-reply>";

    let mut framer = ChunkFramer::new();
    let framed = format!("\n#{}\n{}\n##\n", reply_doc.len(), reply_doc);
    assert_eq!(framer.feed(framed.as_bytes()).unwrap(), FramerStatus::Stop);

    let reply = RpcReply::parse(String::from_utf8(framer.into_message()).unwrap()).unwrap();
    assert!(reply.has_errors());
    let rendered = reply.errors_as_string();
    assert!(rendered.contains("error-tag => operation-failed"));
    assert!(rendered.contains("error-message => config failed"));
}
