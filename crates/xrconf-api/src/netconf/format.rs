//! NETCONF message formatting.
//!
//! Builds the XML bodies for the operations this client uses and wraps them
//! in RFC 6242 chunked framing. Every request carries the session's current
//! message-id; the hello is the sole 1.0-framed message.

use std::fmt::Write;

/// The NETCONF base-1.0 namespace, quoted for attribute embedding.
pub const BASE_1_0_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

/// Client hello advertising base 1.1, with 1.0 end-of-message framing.
pub const HELLO: &str = concat!(
    "<hello xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\">",
    "  <capabilities>\n",
    "    <capability>urn:ietf:params:netconf:base:1.1</capability>\n",
    "  </capabilities>\n",
    "</hello>\n",
    "]]>]]>\n",
);

/// Wrap an RPC body in a single chunk plus the end-of-chunks sentinel.
pub fn frame(body: &str) -> String {
    format!("#{}\n{}\n##\n\n", body.len(), body)
}

fn rpc_open(message_id: u64) -> String {
    format!("<rpc message-id=\"{message_id}\" xmlns=\"{BASE_1_0_NS}\">\n")
}

/// `<get>` with a subtree filter (operational data).
pub fn get(message_id: u64, filter: &str) -> String {
    let mut body = rpc_open(message_id);
    let _ = write!(
        body,
        "  <get>\n    <filter>\n    {filter}\n    </filter>\n  </get>\n</rpc>\n"
    );
    frame(&body)
}

/// `<get-config>` against the running datastore with a subtree filter.
pub fn get_config(message_id: u64, filter: &str) -> String {
    let mut body = rpc_open(message_id);
    let _ = write!(
        body,
        "  <get-config>\n    <source><running/></source>\n    <filter>\n      {filter}\n    </filter>\n  </get-config>\n</rpc>\n"
    );
    frame(&body)
}

/// `<get-config>` against the running datastore, whole datastore (no filter).
pub fn get_config_all(message_id: u64) -> String {
    let mut body = rpc_open(message_id);
    body.push_str("  <get-config>\n    <source><running/></source>\n  </get-config>\n</rpc>\n");
    frame(&body)
}

/// `<edit-config>` against `target` with the given default-operation,
/// wrapping `config` in a `<config>` envelope.
pub fn edit_config(message_id: u64, default_operation: &str, target: &str, config: &str) -> String {
    let mut body = rpc_open(message_id);
    let _ = write!(
        body,
        "  <edit-config>\n    <target><{target}/></target>\n    <default-operation>{default_operation}</default-operation>\n      <config xmlns=\"{BASE_1_0_NS}\">{config}</config>\n  </edit-config>\n</rpc>\n"
    );
    frame(&body)
}

/// `<commit>` of the candidate datastore.
pub fn commit(message_id: u64) -> String {
    let mut body = rpc_open(message_id);
    body.push_str("  <commit/>\n</rpc>\n");
    frame(&body)
}

/// `<close-session>`.
pub fn close_session(message_id: u64) -> String {
    let mut body = rpc_open(message_id);
    body.push_str("   <close-session/>\n </rpc>\n");
    frame(&body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn frame_prefixes_byte_count_and_appends_sentinel() {
        assert_eq!(frame("abcd"), "#4\nabcd\n##\n\n");
    }

    #[test]
    fn frame_counts_bytes_not_chars() {
        // Multi-byte UTF-8 in a description leaf must be counted in octets.
        let body = "<d>caf\u{e9}</d>";
        let framed = frame(body);
        assert!(framed.starts_with(&format!("#{}\n", body.len())));
    }

    #[test]
    fn requests_embed_the_message_id() {
        let msg = get_config(7, "<vrfs xmlns=\"http://example.com/ns\"/>");
        assert!(msg.contains("message-id=\"7\""));
        assert!(msg.contains("<source><running/></source>"));
        assert!(msg.contains("<vrfs xmlns=\"http://example.com/ns\"/>"));
    }

    #[test]
    fn get_config_all_has_no_filter_element() {
        let msg = get_config_all(3);
        assert!(!msg.contains("<filter>"));
    }

    #[test]
    fn edit_config_targets_datastore_with_default_operation() {
        let msg = edit_config(2, "merge", "candidate", "<vrfs/>");
        assert!(msg.contains("<target><candidate/></target>"));
        assert!(msg.contains("<default-operation>merge</default-operation>"));
        assert!(msg.contains("<config xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\"><vrfs/></config>"));
    }

    #[test]
    fn hello_is_eom_framed() {
        assert!(HELLO.ends_with("]]>]]>\n"));
        assert!(HELLO.contains("urn:ietf:params:netconf:base:1.1"));
    }
}
