//! Device node facade.
//!
//! A [`Node`] wraps one connected transport and exposes the configuration
//! operations in domain vocabulary, translating wire errors into
//! [`CoreError`] at the boundary. The [`NodeRegistry`] caches connected
//! nodes by name so repeated operations against the same device reuse one
//! session.

use std::collections::HashMap;

use tracing::debug;
use xrconf_api::{DeviceClient, GetMode, Login, SessionOptions, SetMode};

use crate::error::CoreError;

/// Which transport a node should speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    Netconf,
    Grpc,
}

/// One managed device with a live session.
pub struct Node {
    kind: ClientKind,
    client: DeviceClient,
}

impl Node {
    /// Connect to a device over the requested transport.
    pub async fn connect(
        kind: ClientKind,
        login: Login,
        options: SessionOptions,
    ) -> Result<Self, CoreError> {
        debug!(host = %login.host, ?kind, "connecting node");
        let client = match kind {
            ClientKind::Netconf => DeviceClient::connect_netconf(login, options).await?,
            ClientKind::Grpc => DeviceClient::connect_grpc(login).await?,
        };
        Ok(Self { kind, client })
    }

    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    // ── YANG-JSON operations (gRPC transport) ───────────────────────

    /// Merge the given YANG-JSON config into the running config.
    pub async fn merge_yang(&mut self, yang: &str) -> Result<(), CoreError> {
        Ok(self.client.set(SetMode::Merge, yang).await?)
    }

    /// Replace the targeted subtree of the running config.
    pub async fn replace_yang(&mut self, yang: &str) -> Result<(), CoreError> {
        Ok(self.client.set(SetMode::Replace, yang).await?)
    }

    /// Delete the given YANG-JSON config from the device.
    pub async fn delete_yang(&mut self, yang: &str) -> Result<(), CoreError> {
        Ok(self.client.set(SetMode::Delete, yang).await?)
    }

    /// Retrieve config for the given YANG path filter.
    pub async fn get_yang(&mut self, yang_path: &str) -> Result<Option<String>, CoreError> {
        Ok(self.client.get(GetMode::Config, yang_path).await?)
    }

    /// Retrieve operational data for the given YANG path filter.
    pub async fn get_yang_oper(&mut self, yang_path: &str) -> Result<Option<String>, CoreError> {
        Ok(self.client.get(GetMode::Oper, yang_path).await?)
    }

    // ── XML operations (NETCONF transport) ──────────────────────────

    /// Merge the given XML config into the running config.
    pub async fn merge_netconf(&mut self, config: &str) -> Result<(), CoreError> {
        Ok(self.client.set(SetMode::Merge, config).await?)
    }

    /// Replace the targeted subtree of the running config with XML config.
    pub async fn replace_netconf(&mut self, config: &str) -> Result<(), CoreError> {
        Ok(self.client.set(SetMode::Replace, config).await?)
    }

    /// Retrieve config for the given XML subtree filter.
    pub async fn get_netconf(&mut self, filter: &str) -> Result<Option<String>, CoreError> {
        Ok(self.client.get(GetMode::Config, filter).await?)
    }

    // ── Misc ────────────────────────────────────────────────────────

    /// Run one CLI show command (gRPC transport only).
    pub async fn show(&mut self, command: &str) -> Result<Option<String>, CoreError> {
        Ok(self.client.show(command).await?)
    }

    /// The whole-container filter for a YANG module, in this node's
    /// transport serialization.
    pub fn yang_target(&self, module_name: &str, namespace: &str, container: &str) -> String {
        self.client.yang_target(module_name, namespace, container)
    }

    pub async fn close(&mut self) -> Result<(), CoreError> {
        Ok(self.client.close().await?)
    }
}

/// Named cache of connected nodes.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connected node under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.nodes.insert(name.into(), node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.nodes.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Close every cached session, keeping the first error.
    pub async fn close_all(&mut self) -> Result<(), CoreError> {
        let mut first_error = None;
        for (name, node) in &mut self.nodes {
            if let Err(e) = node.close().await {
                debug!(node = %name, error = %e, "close failed");
                first_error.get_or_insert(e);
            }
        }
        self.nodes.clear();
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
