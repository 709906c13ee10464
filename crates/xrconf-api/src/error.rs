use thiserror::Error;

/// Top-level error type for the `xrconf-api` crate.
///
/// Covers every failure mode across both transports: connection setup,
/// authentication, frame/document parsing, and payloads rejected by the
/// device. `xrconf-core` maps these into its domain taxonomy; raw
/// socket/SSH/gRPC errors never cross the crate boundary unclassified.
#[derive(Debug, Error)]
pub enum Error {
    // ── Connection setup ────────────────────────────────────────────
    /// The device refused the connection (or the probe timed out).
    #[error("Connection refused: {message}")]
    ConnectionRefused { message: String },

    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A request was attempted before `connect()`.
    #[error("Session is not connected")]
    NotConnected,

    // ── Session transport ───────────────────────────────────────────
    /// The session dropped mid-exchange. Retryable: the NETCONF client
    /// reconnects once and replays the in-flight request.
    #[error("Session disconnected: {message}")]
    Disconnected { message: String },

    /// SSH-level failure that is not a disconnect or auth rejection.
    #[error("SSH transport error: {0}")]
    Ssh(#[from] russh::Error),

    /// gRPC channel setup failure.
    #[error("gRPC transport error: {0}")]
    GrpcTransport(#[from] tonic::transport::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Framing / documents ─────────────────────────────────────────
    /// Malformed frame or XML document. Aborts the in-flight RPC only;
    /// the caller decides whether to reconnect.
    #[error("Parse error: {message}")]
    Parse { message: String, text: String },

    // ── Rejected payloads ───────────────────────────────────────────
    /// The device rejected a YANG/XML payload.
    #[error("The config '{rejected_input}' was rejected with error:\n{error}")]
    Yang {
        rejected_input: String,
        error: String,
    },

    /// The device rejected CLI text. `successful_input` holds any commands
    /// that were accepted before the rejection.
    #[error("The command '{rejected_input}' was rejected with error:\n{error}")]
    Cli {
        rejected_input: String,
        successful_input: String,
        error: String,
    },

    // ── Caller misuse ───────────────────────────────────────────────
    /// Invalid construction or call arguments (missing credentials, etc.)
    #[error("Invalid argument: {message}")]
    BadArgument { message: String },

    /// Generic transport/protocol failure not covered above.
    #[error("Client error: {message}")]
    Client { message: String },
}

impl Error {
    /// Returns `true` for session-level disconnects that warrant a single
    /// transparent reconnect-and-retry. RPC-level rejections never do.
    pub fn is_disconnect(&self) -> bool {
        match self {
            Self::Disconnected { .. } => true,
            Self::Ssh(e) => matches!(e, russh::Error::Disconnect | russh::Error::SendError),
            _ => false,
        }
    }

    /// Returns `true` if this error indicates bad credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    pub(crate) fn parse(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            text: text.into(),
        }
    }

    pub(crate) fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }
}
