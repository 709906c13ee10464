//! Canonical configuration trees and reconciliation for IOS-XR YANG data.
//!
//! The core sits between the wire clients (`xrconf-api`) and any outer
//! surface (CLI, automation tooling):
//!
//! - [`model`] — the canonical tree both payload serializations normalize
//!   into.
//! - [`convert`] — YANG-JSON and NETCONF XML front ends for that tree.
//! - [`reconcile`] — the in-sync decision: would applying a target config
//!   change the device?
//! - [`node`] — the device facade and session registry.

pub mod convert;
pub mod error;
pub mod model;
pub mod node;
pub mod reconcile;

pub use convert::{from_json_str, from_xml_str};
pub use error::CoreError;
pub use model::{CanonicalNode, NodeKind, Scalar};
pub use node::{ClientKind, Node, NodeRegistry};
pub use reconcile::{
    Mode, insync_for_merge_json, insync_for_merge_xml, insync_for_replace_json,
    insync_for_replace_xml, needs_change,
};
