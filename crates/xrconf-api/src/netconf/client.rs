//! NETCONF RPC client.
//!
//! Drives the hello exchange, message-id correlated request/reply cycles,
//! and the candidate/commit edit flow on top of a [`Transport`]. A session
//! that drops mid-request is transparently reopened once and the in-flight
//! request replayed, unless the caller opted out.

use tracing::{debug, warn};

use super::format;
use super::framer::{ChunkFramer, Framer, HelloFramer};
use super::reply::RpcReply;
use super::ssh::{Login, SshSession, Transport};
use crate::error::Error;

/// Per-session behavior knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Disable the single reconnect-and-retry on mid-request disconnects.
    pub no_reconnect: bool,
}

/// A NETCONF session against one device.
///
/// Message-ids increase monotonically for the life of the client, across
/// reconnects, so a replayed request never collides with a later one.
pub struct NetconfClient<T = SshSession> {
    login: Login,
    options: SessionOptions,
    session: Option<T>,
    message_id: u64,
}

impl<T: Transport> NetconfClient<T> {
    pub fn new(login: Login, options: SessionOptions) -> Self {
        Self {
            login,
            options,
            session: None,
            message_id: 1,
        }
    }

    /// Open the transport and perform the hello exchange.
    ///
    /// The server's advertised capabilities are read to completion and
    /// discarded: this client always speaks base 1.1 chunked framing, which
    /// IOS-XR advertises unconditionally.
    pub async fn connect(&mut self) -> Result<(), Error> {
        let mut session = T::open(&self.login).await?;
        session.send(format::HELLO.as_bytes()).await?;
        let mut hello = HelloFramer::new();
        session.receive(&mut hello).await?;
        debug!(
            host = %self.login.host,
            hello_len = hello.message().len(),
            "netconf hello exchange complete"
        );
        self.session = Some(session);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Fetch operational data matching an XML subtree filter.
    pub async fn get_oper(&mut self, filter: &str) -> Result<String, Error> {
        let id = self.next_message_id();
        let reply = self.rpc(&format::get(id, filter), filter).await?;
        reply.data_as_string()
    }

    /// Fetch running configuration, optionally narrowed by a subtree filter.
    pub async fn get_config(&mut self, filter: Option<&str>) -> Result<String, Error> {
        let id = self.next_message_id();
        let request = match filter {
            Some(filter) => format::get_config(id, filter),
            None => format::get_config_all(id),
        };
        let reply = self.rpc(&request, filter.unwrap_or("")).await?;
        reply.data_as_string()
    }

    /// Apply `config` to the candidate datastore and commit it.
    ///
    /// `default_operation` is the NETCONF operation vocabulary
    /// (`merge` / `replace`); per-element `delete` markers ride inside the
    /// config document itself.
    pub async fn edit_config(
        &mut self,
        default_operation: &str,
        config: &str,
    ) -> Result<(), Error> {
        let id = self.next_message_id();
        let request = format::edit_config(id, default_operation, "candidate", config);
        self.rpc(&request, config).await?;
        self.commit().await
    }

    /// Commit the candidate datastore to running.
    ///
    /// A rejection names `<commit/>` as the rejected input, so a failed
    /// commit (which leaves the candidate dirty) reads differently from a
    /// rejected edit.
    pub async fn commit(&mut self) -> Result<(), Error> {
        let id = self.next_message_id();
        self.rpc(&format::commit(id), "<commit/>").await?;
        Ok(())
    }

    /// Send `<close-session>` and tear down the transport.
    pub async fn close(&mut self) -> Result<(), Error> {
        if let Some(mut session) = self.session.take() {
            let id = self.next_message_id();
            // The device may drop the channel before replying; that is a
            // normal close, not an error.
            let request = format::close_session(id);
            if session.send(request.as_bytes()).await.is_ok() {
                let mut framer = ChunkFramer::new();
                session.receive(&mut framer).await.ok();
            }
            session.close().await?;
        }
        Ok(())
    }

    fn next_message_id(&mut self) -> u64 {
        let id = self.message_id;
        self.message_id += 1;
        id
    }

    /// One request/reply cycle with the reconnect-once policy.
    ///
    /// `rejected_input` is the caller-facing payload to report if the device
    /// answers with `rpc-error`. An `rpc-error` reply is a completed
    /// exchange: it is never retried.
    async fn rpc(&mut self, request: &str, rejected_input: &str) -> Result<RpcReply, Error> {
        match self.rpc_once(request).await {
            Err(e) if e.is_disconnect() && !self.options.no_reconnect => {
                warn!(host = %self.login.host, error = %e, "session dropped, reconnecting once");
                self.session = None;
                self.connect().await?;
                let reply = self.rpc_once(request).await?;
                self.check_reply(reply, rejected_input)
            }
            Err(e) => {
                if e.is_disconnect() {
                    self.session = None;
                }
                Err(e)
            }
            Ok(reply) => self.check_reply(reply, rejected_input),
        }
    }

    async fn rpc_once(&mut self, request: &str) -> Result<RpcReply, Error> {
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;
        session.send(request.as_bytes()).await?;
        let mut framer = ChunkFramer::new();
        session.receive(&mut framer).await?;
        let raw = String::from_utf8(framer.into_message())
            .map_err(|e| Error::parse(e.to_string(), "<non-utf8 reply>"))?;
        RpcReply::parse(raw)
    }

    fn check_reply(&self, reply: RpcReply, rejected_input: &str) -> Result<RpcReply, Error> {
        if reply.has_errors() {
            return Err(Error::Yang {
                rejected_input: rejected_input.to_owned(),
                error: reply.errors_as_string(),
            });
        }
        Ok(reply)
    }
}
