//! Normalization of transport payloads into canonical trees.
//!
//! YANG-JSON documents and NETCONF XML subtrees both become
//! [`CanonicalNode`] trees with identical comparison semantics. An empty or
//! whitespace-only document normalizes to the empty map, so "no config" and
//! "{}" reconcile identically.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{CanonicalNode, NodeKind, Scalar};

/// The NETCONF base-1.0 namespace, where the `operation` attribute lives.
const NC_BASE_1_0_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

/// The JSON delete-marker convention: a `"delete": "delete"` entry marks
/// its containing object for deletion.
const DELETE_KEY: &str = "delete";

// ── JSON ─────────────────────────────────────────────────────────────

/// Parse a YANG-JSON document into a canonical tree.
pub fn from_json_str(input: &str) -> Result<CanonicalNode, CoreError> {
    if input.trim().is_empty() {
        return Ok(CanonicalNode::empty());
    }
    let value: Value = serde_json::from_str(input).map_err(|e| CoreError::InvalidDocument {
        format: "JSON",
        message: e.to_string(),
    })?;
    Ok(from_json_value(value))
}

fn from_json_value(value: Value) -> CanonicalNode {
    match value {
        Value::Null => CanonicalNode::leaf(Scalar::Null),
        Value::Bool(b) => CanonicalNode::leaf(Scalar::Bool(b)),
        Value::Number(n) => CanonicalNode::leaf(Scalar::Number(n)),
        Value::String(s) => CanonicalNode::leaf(Scalar::Text(s)),
        Value::Array(items) => {
            CanonicalNode::list(items.into_iter().map(from_json_value).collect())
        }
        Value::Object(entries) => {
            let mut marked = false;
            let mut map = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                if key == DELETE_KEY && value.as_str() == Some(DELETE_KEY) {
                    marked = true;
                    continue;
                }
                map.insert(key, from_json_value(value));
            }
            let mut node = CanonicalNode::map(map);
            node.marked_for_delete = marked;
            node
        }
    }
}

// ── XML ──────────────────────────────────────────────────────────────

/// Parse a NETCONF XML subtree into a canonical tree.
///
/// Each element becomes a one-entry map keyed by its local name. An element
/// with a single text child becomes `{name: [text]}`; an element with no
/// element children becomes `{name: []}`; otherwise the children convert
/// recursively. Mixed text-and-element content has no canonical form and is
/// rejected.
pub fn from_xml_str(input: &str) -> Result<CanonicalNode, CoreError> {
    if input.trim().is_empty() {
        return Ok(CanonicalNode::empty());
    }
    let doc = roxmltree::Document::parse(input).map_err(|e| CoreError::InvalidDocument {
        format: "XML",
        message: e.to_string(),
    })?;
    from_xml_element(doc.root_element())
}

fn from_xml_element(node: roxmltree::Node<'_, '_>) -> Result<CanonicalNode, CoreError> {
    let elements: Vec<_> = node.children().filter(roxmltree::Node::is_element).collect();
    let text = node
        .children()
        .filter(roxmltree::Node::is_text)
        .filter_map(|c| c.text())
        .map(str::trim)
        .find(|t| !t.is_empty());

    let value = if elements.is_empty() {
        match text {
            Some(text) => {
                CanonicalNode::list(vec![CanonicalNode::leaf(Scalar::Text(text.to_owned()))])
            }
            None => CanonicalNode::list(vec![]),
        }
    } else if text.is_some() {
        return Err(CoreError::UnsupportedShape {
            message: format!(
                "element '{}' mixes text and child elements",
                node.tag_name().name()
            ),
        });
    } else {
        let children = elements
            .into_iter()
            .map(from_xml_element)
            .collect::<Result<Vec<_>, _>>()?;
        CanonicalNode::list(children)
    };

    let mut map = IndexMap::with_capacity(1);
    map.insert(node.tag_name().name().to_owned(), value);
    let mut out = CanonicalNode::map(map);
    out.marked_for_delete = node
        .attributes()
        .any(|a| {
            a.namespace() == Some(NC_BASE_1_0_NS) && a.name() == "operation" && a.value() == "delete"
        });
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_leaf(s: &str) -> CanonicalNode {
        CanonicalNode::leaf(Scalar::Text(s.to_owned()))
    }

    #[test]
    fn empty_documents_normalize_to_the_empty_map() {
        assert_eq!(from_json_str("").unwrap(), CanonicalNode::empty());
        assert_eq!(from_json_str("  \n").unwrap(), CanonicalNode::empty());
        assert_eq!(from_xml_str("").unwrap(), CanonicalNode::empty());
    }

    #[test]
    fn json_delete_marker_is_lifted_out_of_the_map() {
        let node = from_json_str(r#"{"vrf-name": "BLUE", "delete": "delete"}"#).unwrap();
        assert!(node.marked_for_delete);
        let NodeKind::Map(map) = &node.kind else {
            panic!("expected map");
        };
        assert_eq!(map.len(), 1);
        assert_eq!(map["vrf-name"], text_leaf("BLUE"));
    }

    #[test]
    fn json_delete_key_with_other_value_is_plain_data() {
        let node = from_json_str(r#"{"delete": "later"}"#).unwrap();
        assert!(!node.marked_for_delete);
        let NodeKind::Map(map) = &node.kind else {
            panic!("expected map");
        };
        assert_eq!(map["delete"], text_leaf("later"));
    }

    #[test]
    fn json_null_becomes_null_leaf() {
        let node = from_json_str(r#"{"vrfs": [null]}"#).unwrap();
        let NodeKind::Map(map) = &node.kind else {
            panic!("expected map");
        };
        assert!(map["vrfs"].is_nil_array());
    }

    #[test]
    fn xml_element_with_text_becomes_singleton_list() {
        let node = from_xml_str("<vrf-name>BLUE</vrf-name>").unwrap();
        let NodeKind::Map(map) = &node.kind else {
            panic!("expected map");
        };
        assert_eq!(map["vrf-name"], CanonicalNode::list(vec![text_leaf("BLUE")]));
    }

    #[test]
    fn xml_empty_element_becomes_empty_list() {
        let node = from_xml_str("<create/>").unwrap();
        let NodeKind::Map(map) = &node.kind else {
            panic!("expected map");
        };
        assert_eq!(map["create"], CanonicalNode::list(vec![]));
    }

    #[test]
    fn xml_nested_elements_become_child_maps() {
        let node = from_xml_str(
            "<vrfs xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\">\n  \
             <vrf><vrf-name>BLUE</vrf-name><create/></vrf>\n</vrfs>",
        )
        .unwrap();
        let NodeKind::Map(map) = &node.kind else {
            panic!("expected map");
        };
        let NodeKind::List(vrfs) = &map["vrfs"].kind else {
            panic!("expected list of children");
        };
        assert_eq!(vrfs.len(), 1);
        let NodeKind::Map(vrf) = &vrfs[0].kind else {
            panic!("expected child map");
        };
        let NodeKind::List(fields) = &vrf["vrf"].kind else {
            panic!("expected field list");
        };
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn xml_whitespace_between_elements_is_ignored() {
        let compact = from_xml_str("<a><b>x</b></a>").unwrap();
        let spaced = from_xml_str("<a>\n  <b>\n    x\n  </b>\n</a>").unwrap();
        assert_eq!(compact, spaced);
    }

    #[test]
    fn xml_delete_operation_marks_the_element() {
        let node = from_xml_str(
            "<vrf xmlns:xc=\"urn:ietf:params:xml:ns:netconf:base:1.0\" \
             xc:operation=\"delete\"><vrf-name>BLUE</vrf-name></vrf>",
        )
        .unwrap();
        assert!(node.marked_for_delete);
    }

    #[test]
    fn xml_operation_outside_base_ns_is_ignored() {
        let node = from_xml_str("<vrf operation=\"delete\"><vrf-name>X</vrf-name></vrf>").unwrap();
        assert!(!node.marked_for_delete);
    }

    #[test]
    fn xml_mixed_content_is_rejected() {
        let err = from_xml_str("<a>text<b/></a>").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedShape { .. }));
    }

    #[test]
    fn malformed_documents_are_invalid() {
        assert!(matches!(
            from_json_str("{"),
            Err(CoreError::InvalidDocument { format: "JSON", .. })
        ));
        assert!(matches!(
            from_xml_str("<a><b></a>"),
            Err(CoreError::InvalidDocument { format: "XML", .. })
        ));
    }
}
