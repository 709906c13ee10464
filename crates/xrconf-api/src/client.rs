//! Transport-selecting device client.
//!
//! Callers pick NETCONF or gRPC once, at connection time, and from then on
//! use one `set`/`get` surface with the logical mode vocabulary. Payload
//! serialization (XML vs YANG-JSON) is the caller's concern; this layer
//! routes, validates arguments, and keeps the per-transport quirks out of
//! `xrconf-core`.

use tracing::debug;

use crate::error::Error;
use crate::grpc::GrpcClient;
use crate::netconf::{Login, NetconfClient, SessionOptions};

/// Logical write mode, mapped per transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    Merge,
    Replace,
    Delete,
}

impl SetMode {
    /// The NETCONF `default-operation` vocabulary.
    pub fn netconf_operation(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Replace => "replace",
            Self::Delete => "delete",
        }
    }

    /// The EMS gRPC method vocabulary.
    pub fn yang_operation(self) -> &'static str {
        match self {
            Self::Merge => "merge_config",
            Self::Replace => "replace_config",
            Self::Delete => "delete_config",
        }
    }
}

/// Logical read mode: the running configuration or operational state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMode {
    Config,
    Oper,
}

/// A connected session over one of the two supported transports.
pub enum DeviceClient {
    Netconf(NetconfClient),
    Grpc(GrpcClient),
}

impl DeviceClient {
    /// Connect over NETCONF/SSH.
    pub async fn connect_netconf(login: Login, options: SessionOptions) -> Result<Self, Error> {
        let mut client: NetconfClient = NetconfClient::new(login, options);
        client.connect().await?;
        Ok(Self::Netconf(client))
    }

    /// Connect over EMS gRPC.
    pub async fn connect_grpc(login: Login) -> Result<Self, Error> {
        Ok(Self::Grpc(GrpcClient::connect(login).await?))
    }

    /// Apply a configuration payload. Empty payloads are a no-op.
    ///
    /// The payload serialization must match the transport: XML subtrees for
    /// NETCONF (with any per-element delete markers already embedded),
    /// YANG-JSON for gRPC.
    pub async fn set(&mut self, mode: SetMode, payload: &str) -> Result<(), Error> {
        if payload.trim().is_empty() {
            return Ok(());
        }
        debug!(mode = mode.yang_operation(), len = payload.len(), "set");
        match self {
            Self::Netconf(client) => {
                client.edit_config(mode.netconf_operation(), payload).await
            }
            Self::Grpc(client) => match mode {
                SetMode::Merge => client.merge_config(payload).await,
                SetMode::Replace => client.replace_config(payload).await,
                SetMode::Delete => client.delete_config(payload).await,
            },
        }
    }

    /// Read configuration or operational data matching `filter`.
    ///
    /// An empty or whitespace-only filter yields `None` without a device
    /// round trip. On NETCONF a filter that is not well-formed XML is
    /// rejected locally; gRPC filters go to the device as-is and the device
    /// reports any rejection.
    pub async fn get(&mut self, mode: GetMode, filter: &str) -> Result<Option<String>, Error> {
        if filter.trim().is_empty() {
            return Ok(None);
        }
        match self {
            Self::Netconf(client) => {
                if let Err(e) = roxmltree::Document::parse(filter) {
                    return Err(Error::Yang {
                        rejected_input: filter.to_owned(),
                        error: e.to_string(),
                    });
                }
                let data = match mode {
                    GetMode::Config => client.get_config(Some(filter)).await?,
                    GetMode::Oper => client.get_oper(filter).await?,
                };
                Ok(Some(data))
            }
            Self::Grpc(client) => {
                let data = match mode {
                    GetMode::Config => client.get_config(filter).await?,
                    GetMode::Oper => client.get_oper(filter).await?,
                };
                Ok(Some(data))
            }
        }
    }

    /// Run one CLI show command (gRPC only). Empty commands yield `None`.
    pub async fn show(&mut self, command: &str) -> Result<Option<String>, Error> {
        if command.trim().is_empty() {
            return Ok(None);
        }
        match self {
            Self::Netconf(_) => Err(Error::BadArgument {
                message: "CLI show commands require the gRPC transport".into(),
            }),
            Self::Grpc(client) => Ok(Some(client.show_cmd_text(command).await?)),
        }
    }

    /// The whole-container filter for `module_name`/`container`, in this
    /// transport's serialization.
    pub fn yang_target(&self, module_name: &str, namespace: &str, container: &str) -> String {
        match self {
            Self::Netconf(_) => format!("<{container} xmlns=\"{namespace}\"/>"),
            Self::Grpc(_) => format!("{{\"{module_name}:{container}\": [null]}}"),
        }
    }

    /// Close the session. NETCONF sends `<close-session>`; gRPC channels
    /// carry no session state to tear down.
    pub async fn close(&mut self) -> Result<(), Error> {
        match self {
            Self::Netconf(client) => client.close().await,
            Self::Grpc(_) => Ok(()),
        }
    }
}
