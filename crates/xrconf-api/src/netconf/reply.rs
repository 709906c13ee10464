//! `rpc-reply` parsing.
//!
//! Owns the raw reply document for the duration of one response cycle.
//! `rpc-error` children are flattened into field-name → text maps up front;
//! configuration/operational payloads are re-serialized from the children of
//! `rpc-reply/data` on demand.

use std::fmt::Write;

use crate::error::Error;

/// One `rpc-error` element, flattened to `{child-element-name: text}`.
pub type RpcError = Vec<(String, String)>;

/// A parsed NETCONF reply.
#[derive(Debug)]
pub struct RpcReply {
    raw: String,
    errors: Vec<RpcError>,
}

impl RpcReply {
    /// Parse a reply document, extracting any `rpc-error` elements.
    pub fn parse(raw: String) -> Result<Self, Error> {
        let errors = {
            let doc = roxmltree::Document::parse(&raw)
                .map_err(|e| Error::parse(e.to_string(), raw.clone()))?;
            let root = doc.root_element();
            root.children()
                .filter(|n| n.is_element() && n.tag_name().name() == "rpc-error")
                .map(|err| {
                    err.children()
                        .filter(|c| c.is_element())
                        .map(|c| {
                            (
                                c.tag_name().name().to_owned(),
                                c.text().map(str::trim).unwrap_or("").to_owned(),
                            )
                        })
                        .collect()
                })
                .collect()
        };
        Ok(Self { raw, errors })
    }

    /// The raw reply document text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn errors(&self) -> &[RpcError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Flatten all errors to `field => value` lines for diagnostics.
    pub fn errors_as_string(&self) -> String {
        let mut out = String::new();
        for err in &self.errors {
            for (field, value) in err {
                let _ = writeln!(out, "{field} => {value}");
            }
        }
        out
    }

    /// Serialize the children of `rpc-reply/data` back to XML text.
    ///
    /// This is the configuration/operational payload the caller asked for,
    /// stripped of the NETCONF envelope. Returns an empty string when the
    /// reply carries no `<data>` element (e.g. an `<ok/>` reply).
    pub fn data_as_string(&self) -> Result<String, Error> {
        let doc = roxmltree::Document::parse(&self.raw)
            .map_err(|e| Error::parse(e.to_string(), self.raw.clone()))?;
        let root = doc.root_element();
        let mut out = String::new();
        for data in root
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "data")
        {
            for child in data.children().filter(roxmltree::Node::is_element) {
                write_element(child, &mut out, 0);
            }
        }
        Ok(out)
    }
}

// ── XML re-serialization ─────────────────────────────────────────────

/// Write `node` and its subtree as indented XML.
///
/// Namespace declarations are re-emitted wherever an element's namespace
/// differs from its parent's, which is sufficient for the default-namespace
/// style IOS-XR uses in its replies.
fn write_element(node: roxmltree::Node<'_, '_>, out: &mut String, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = node.tag_name().name();
    let _ = write!(out, "{indent}<{name}");

    let ns = node.tag_name().namespace();
    let parent_ns = node
        .parent()
        .filter(roxmltree::Node::is_element)
        .and_then(|p| p.tag_name().namespace());
    if let Some(ns) = ns {
        if Some(ns) != parent_ns {
            let _ = write!(out, " xmlns=\"{}\"", escape_attr(ns));
        }
    }
    for (i, attr) in node.attributes().enumerate() {
        // Namespaced attributes (e.g. the base-1.0 `operation` marker) keep
        // their namespace under a locally declared prefix.
        match attr.namespace() {
            Some(attr_ns) => {
                let _ = write!(
                    out,
                    " xmlns:ns{i}=\"{}\" ns{i}:{}=\"{}\"",
                    escape_attr(attr_ns),
                    attr.name(),
                    escape_attr(attr.value())
                );
            }
            None => {
                let _ = write!(out, " {}=\"{}\"", attr.name(), escape_attr(attr.value()));
            }
        }
    }

    let children: Vec<_> = node.children().filter(roxmltree::Node::is_element).collect();
    if children.is_empty() {
        match node.text().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => {
                let _ = writeln!(out, ">{}</{name}>", escape_text(text));
            }
            None => {
                let _ = writeln!(out, "/>");
            }
        }
    } else {
        let _ = writeln!(out, ">");
        for child in children {
            write_element(child, out, depth + 1);
        }
        let _ = writeln!(out, "{indent}</{name}>");
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OK_REPLY: &str = r#"<rpc-reply message-id="1" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0"><ok/></rpc-reply>"#;

    const ERROR_REPLY: &str = r#"<rpc-reply message-id="2" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <rpc-error>
    <error-type>rpc</error-type>
    <error-tag>malformed-message</error-tag>
    <error-severity>error</error-severity>
  </rpc-error>
</rpc-reply>"#;

    const DATA_REPLY: &str = r#"<rpc-reply message-id="3" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <data>
    <vrfs xmlns="http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg">
      <vrf>
        <vrf-name>red</vrf-name>
        <create/>
      </vrf>
    </vrfs>
  </data>
</rpc-reply>"#;

    #[test]
    fn ok_reply_has_no_errors() {
        let reply = RpcReply::parse(OK_REPLY.into()).unwrap();
        assert!(!reply.has_errors());
        assert_eq!(reply.data_as_string().unwrap(), "");
    }

    #[test]
    fn rpc_errors_flatten_to_field_maps() {
        let reply = RpcReply::parse(ERROR_REPLY.into()).unwrap();
        assert!(reply.has_errors());
        assert_eq!(
            reply.errors_as_string(),
            "error-type => rpc\nerror-tag => malformed-message\nerror-severity => error\n"
        );
    }

    #[test]
    fn data_children_reserialize_with_namespace() {
        let reply = RpcReply::parse(DATA_REPLY.into()).unwrap();
        let data = reply.data_as_string().unwrap();
        assert!(data.starts_with("<vrfs xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\">"));
        assert!(data.contains("<vrf-name>red</vrf-name>"));
        assert!(data.contains("<create/>"));
    }

    #[test]
    fn namespaced_attributes_keep_their_namespace() {
        let reply = RpcReply::parse(
            "<rpc-reply message-id=\"4\" xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\" \
             xmlns:xc=\"urn:ietf:params:xml:ns:netconf:base:1.0\"><data>\
             <vrfs xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\">\
             <vrf xc:operation=\"delete\"><vrf-name>BLUE</vrf-name></vrf>\
             </vrfs></data></rpc-reply>"
                .into(),
        )
        .unwrap();
        let data = reply.data_as_string().unwrap();
        assert!(data.contains(
            "<vrf xmlns:ns0=\"urn:ietf:params:xml:ns:netconf:base:1.0\" \
             ns0:operation=\"delete\">"
        ));
    }

    #[test]
    fn malformed_reply_is_a_parse_error() {
        let err = RpcReply::parse("<rpc-reply><unclosed".into()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
