use thiserror::Error;

/// Domain-level error taxonomy.
///
/// Transport errors from `xrconf-api` are folded into this enum so callers
/// above the core never match on wire-level types.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Document handling ───────────────────────────────────────────
    /// A configuration document could not be parsed into a canonical tree.
    #[error("invalid {format} document: {message}")]
    InvalidDocument { format: &'static str, message: String },

    /// A parsed document has a shape reconciliation cannot work with.
    #[error("unsupported document shape: {message}")]
    UnsupportedShape { message: String },

    // ── Device interaction ──────────────────────────────────────────
    /// The device could not be reached or refused the session.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The device rejected the credentials.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The device rejected a payload or command.
    #[error("device rejected input '{rejected_input}':\n{error}")]
    Rejected {
        rejected_input: String,
        error: String,
    },

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    // ── Caller misuse ───────────────────────────────────────────────
    #[error("invalid argument: {message}")]
    BadArgument { message: String },
}

impl From<xrconf_api::Error> for CoreError {
    fn from(err: xrconf_api::Error) -> Self {
        use xrconf_api::Error as Api;
        match err {
            Api::ConnectionRefused { message }
            | Api::Disconnected { message } => Self::Connection { message },
            Api::NotConnected => Self::Connection {
                message: "session is not connected".into(),
            },
            Api::Authentication { message } => Self::Authentication { message },
            Api::Yang {
                rejected_input,
                error,
            } => Self::Rejected {
                rejected_input,
                error,
            },
            Api::Cli {
                rejected_input,
                error,
                ..
            } => Self::Rejected {
                rejected_input,
                error,
            },
            Api::BadArgument { message } => Self::BadArgument { message },
            other => Self::Transport(other.to_string()),
        }
    }
}
