//! Semantic configuration reconciliation.
//!
//! Decides whether a target configuration is already satisfied by the
//! device's running configuration, so no-op writes can be skipped. The
//! comparison is structural and order-insensitive: maps match by key, lists
//! by unordered first-match search. Under [`Mode::Merge`] the target must be
//! a satisfied subtree of the current config; [`Mode::Replace`] additionally
//! requires the current config to carry nothing beyond the target.
//!
//! Delete markers invert the test for their element: a marked element that
//! is still present in the current config forces a change, while a marked
//! element that is already absent is a no-op and is discounted from the
//! replace-mode size comparison.

use tracing::trace;

use crate::convert;
use crate::error::CoreError;
use crate::model::{CanonicalNode, NodeKind};

/// Which write operation the comparison is deciding for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Merge,
    Replace,
}

/// Returns `true` when applying `target` under `mode` would change the
/// device's configuration.
///
/// Both roots must be maps (the shape every normalized document has).
pub fn needs_change(
    mode: Mode,
    target: &CanonicalNode,
    current: &CanonicalNode,
) -> Result<bool, CoreError> {
    match (&target.kind, &current.kind) {
        (NodeKind::Map(target_map), NodeKind::Map(current_map)) => {
            let insync = map_equiv(mode, target_map, current_map);
            trace!(?mode, insync, "reconciliation decided");
            Ok(!insync)
        }
        _ => Err(CoreError::UnsupportedShape {
            message: "configuration roots must be objects".into(),
        }),
    }
}

/// In-sync check for a merge of YANG-JSON documents.
pub fn insync_for_merge_json(target: &str, current: &str) -> Result<bool, CoreError> {
    insync_json(Mode::Merge, target, current)
}

/// In-sync check for a replace of YANG-JSON documents.
pub fn insync_for_replace_json(target: &str, current: &str) -> Result<bool, CoreError> {
    insync_json(Mode::Replace, target, current)
}

/// In-sync check for a merge of NETCONF XML documents.
pub fn insync_for_merge_xml(target: &str, current: &str) -> Result<bool, CoreError> {
    insync_xml(Mode::Merge, target, current)
}

/// In-sync check for a replace of NETCONF XML documents.
pub fn insync_for_replace_xml(target: &str, current: &str) -> Result<bool, CoreError> {
    insync_xml(Mode::Replace, target, current)
}

fn insync_json(mode: Mode, target: &str, current: &str) -> Result<bool, CoreError> {
    let target = convert::from_json_str(target)?;
    let current = convert::from_json_str(current)?;
    Ok(!needs_change(mode, &target, &current)?)
}

fn insync_xml(mode: Mode, target: &str, current: &str) -> Result<bool, CoreError> {
    let target = convert::from_xml_str(target)?;
    let current = convert::from_xml_str(current)?;
    Ok(!needs_change(mode, &target, &current)?)
}

// ── Structural comparison ────────────────────────────────────────────

/// Does `current` satisfy `target`, honoring `target`'s delete marker?
fn sub_elt(mode: Mode, target: &CanonicalNode, current: &CanonicalNode) -> bool {
    if target.marked_for_delete {
        // A marked element that still exists as a map is a pending delete.
        // Against any other current shape the delete is vacuously satisfied.
        return !(target.is_map() && current.is_map());
    }
    sub_elt_unmarked(mode, target, current)
}

/// [`sub_elt`] with the target's own delete marker disregarded, used when a
/// list is probing whether a marked element still exists.
fn sub_elt_unmarked(mode: Mode, target: &CanonicalNode, current: &CanonicalNode) -> bool {
    match (&target.kind, &current.kind) {
        (NodeKind::Map(target_map), NodeKind::Map(current_map)) => {
            map_equiv(mode, target_map, current_map)
        }
        (NodeKind::List(target_list), NodeKind::List(current_list)) => {
            list_equiv(mode, target_list, current_list)
        }
        // Leaves and shape mismatches: exact equality, or the create
        // sentinel which asserts presence without constraining the value.
        _ => target.kind == current.kind || target.is_nil_array(),
    }
}

fn map_equiv(
    mode: Mode,
    target: &indexmap::IndexMap<String, CanonicalNode>,
    current: &indexmap::IndexMap<String, CanonicalNode>,
) -> bool {
    for (key, target_value) in target {
        // A null current value reads the same as an absent key.
        match current.get(key).filter(|v| !v.is_null_leaf()) {
            None => {
                if !target_value.is_nil_array() {
                    return false;
                }
            }
            Some(current_value) => {
                if !sub_elt(mode, target_value, current_value) {
                    return false;
                }
            }
        }
    }
    mode != Mode::Replace || current.len() == target.len()
}

fn list_equiv(mode: Mode, target: &[CanonicalNode], current: &[CanonicalNode]) -> bool {
    // Deletes of already-absent elements are no-ops; replace-mode element
    // counting has to discount them.
    let mut no_op_deletes = 0usize;
    for target_elt in target {
        let matched = current
            .iter()
            .any(|current_elt| sub_elt_unmarked(mode, target_elt, current_elt))
            || target_elt.is_nil_array();
        if matched {
            if target_elt.marked_for_delete {
                return false;
            }
        } else if target_elt.marked_for_delete {
            no_op_deletes += 1;
        } else {
            return false;
        }
    }
    if mode == Mode::Replace {
        // Null placeholder elements do not count toward the size check.
        let current_len = current.iter().filter(|e| !e.is_null_leaf()).count();
        let target_len = target.iter().filter(|e| !e.is_null_leaf()).count() - no_op_deletes;
        return current_len == target_len;
    }
    true
}
