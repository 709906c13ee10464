//! SSH transport for the NETCONF subsystem.
//!
//! Thin wrapper over [`russh`]: opens a session, authenticates with a
//! password, requests the `netconf` subsystem, and exposes raw send/receive
//! over the resulting channel. Framing lives in [`super::framer`]; this
//! module never inspects message content.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use super::framer::{Framer, FramerStatus};
use crate::error::Error;

/// Credentials and address for one device.
#[derive(Debug, Clone)]
pub struct Login {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl Login {
    /// Validate the fields a connection attempt requires.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.is_empty() {
            return Err(Error::BadArgument {
                message: "host must not be empty".into(),
            });
        }
        if self.username.is_empty() {
            return Err(Error::BadArgument {
                message: "username must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Byte transport carrying one NETCONF session.
///
/// [`SshSession`] is the production implementation; the seam lets the
/// session logic in [`super::client`] run against a scripted transport.
#[allow(async_fn_in_trait)]
pub trait Transport: Sized {
    /// Connect, authenticate, and open the subsystem channel.
    async fn open(login: &Login) -> Result<Self, Error>;
    /// Send raw bytes.
    async fn send(&mut self, data: &[u8]) -> Result<(), Error>;
    /// Pump received bytes into `framer` until it reports a complete
    /// message.
    async fn receive(&mut self, framer: &mut dyn Framer) -> Result<(), Error>;
    /// Tear down the transport.
    async fn close(self) -> Result<(), Error>;
}

/// Accepts any host key. Management networks for these devices pin access at
/// the network layer; host-key pinning is handled outside this client.
struct AcceptingHandler;

#[async_trait]
impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh_keys::key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// An authenticated SSH session with an open `netconf` subsystem channel.
pub struct SshSession {
    handle: client::Handle<AcceptingHandler>,
    channel: Channel<Msg>,
}

impl Transport for SshSession {
    /// Connect, authenticate, and open the `netconf` subsystem.
    async fn open(login: &Login) -> Result<Self, Error> {
        login.validate()?;
        let config = Arc::new(client::Config {
            inactivity_timeout: Some(Duration::from_secs(3600)),
            ..client::Config::default()
        });

        debug!(host = %login.host, port = login.port, "opening ssh session");
        let mut handle =
            client::connect(config, (login.host.as_str(), login.port), AcceptingHandler)
                .await
                .map_err(|e| Error::ConnectionRefused {
                    message: e.to_string(),
                })?;

        let authenticated = handle
            .authenticate_password(&login.username, login.password.expose_secret())
            .await?;
        if !authenticated {
            return Err(Error::Authentication {
                message: format!("password rejected for user '{}'", login.username),
            });
        }

        let channel = handle.channel_open_session().await?;
        channel.request_subsystem(true, "netconf").await?;
        debug!(host = %login.host, "netconf subsystem open");

        Ok(Self { handle, channel })
    }

    /// Send raw bytes down the channel.
    async fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        trace!(len = data.len(), "ssh send");
        self.channel.data(data).await.map_err(|_| Error::Disconnected {
            message: "channel closed while sending".into(),
        })
    }

    /// Pump channel data into `framer` until it reports a complete message.
    ///
    /// EOF or channel close before the framer completes is a disconnect: the
    /// caller gets the reconnect-once treatment.
    async fn receive(&mut self, framer: &mut dyn Framer) -> Result<(), Error> {
        loop {
            let Some(msg) = self.channel.wait().await else {
                return Err(Error::Disconnected {
                    message: "channel closed mid-reply".into(),
                });
            };
            match msg {
                ChannelMsg::Data { ref data } => {
                    trace!(len = data.len(), "ssh recv");
                    if framer.feed(data)? == FramerStatus::Stop {
                        return Ok(());
                    }
                }
                ChannelMsg::ExtendedData { ref data, .. } => {
                    trace!(len = data.len(), "ssh recv (stderr, ignored)");
                }
                ChannelMsg::Eof | ChannelMsg::Close => {
                    return Err(Error::Disconnected {
                        message: "session closed by peer".into(),
                    });
                }
                _ => {}
            }
        }
    }

    /// Close the channel and disconnect the session.
    async fn close(self) -> Result<(), Error> {
        self.channel.eof().await.ok();
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
            .ok();
        Ok(())
    }
}
