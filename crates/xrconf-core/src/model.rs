//! Canonical configuration trees.
//!
//! Both transports' payloads (YANG-JSON and NETCONF XML) normalize into the
//! same three-shape tree so one reconciliation engine serves both. Map entry
//! order is preserved for faithful round-tripping but carries no meaning for
//! comparison.

use indexmap::IndexMap;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

/// The shape of one tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf(Scalar),
    List(Vec<CanonicalNode>),
    Map(IndexMap<String, CanonicalNode>),
}

/// One node of a canonical configuration tree.
///
/// `marked_for_delete` carries the per-element delete marker: the JSON
/// `"delete": "delete"` convention or the NETCONF `operation="delete"`
/// attribute, lifted out of the data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalNode {
    pub kind: NodeKind,
    pub marked_for_delete: bool,
}

impl CanonicalNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            marked_for_delete: false,
        }
    }

    pub fn leaf(scalar: Scalar) -> Self {
        Self::new(NodeKind::Leaf(scalar))
    }

    pub fn list(items: Vec<CanonicalNode>) -> Self {
        Self::new(NodeKind::List(items))
    }

    pub fn map(entries: IndexMap<String, CanonicalNode>) -> Self {
        Self::new(NodeKind::Map(entries))
    }

    /// The empty tree: what an absent or empty document normalizes to.
    pub fn empty() -> Self {
        Self::map(IndexMap::new())
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, NodeKind::Map(_))
    }

    pub fn is_null_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(Scalar::Null))
    }

    /// The "create" sentinel: a null leaf, or a one-element list holding a
    /// null leaf. Such a target element asserts presence of its key without
    /// constraining the value.
    pub fn is_nil_array(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(Scalar::Null) => true,
            NodeKind::List(items) => items.len() == 1 && items[0].is_null_leaf(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn nil_array_sentinels() {
        assert!(CanonicalNode::leaf(Scalar::Null).is_nil_array());
        assert!(CanonicalNode::list(vec![CanonicalNode::leaf(Scalar::Null)]).is_nil_array());
        assert!(!CanonicalNode::list(vec![]).is_nil_array());
        assert!(
            !CanonicalNode::list(vec![
                CanonicalNode::leaf(Scalar::Null),
                CanonicalNode::leaf(Scalar::Null),
            ])
            .is_nil_array()
        );
        assert!(!CanonicalNode::leaf(Scalar::Text("null".into())).is_nil_array());
        assert!(!CanonicalNode::empty().is_nil_array());
    }
}
