//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use xrconf_config::ConfigError;
use xrconf_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const REJECTED: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ──────────────────────────────────────────────────
    #[error("Could not connect to the device")]
    #[diagnostic(
        code(xrconf::connection_failed),
        help(
            "Check that the device is reachable and the NETCONF/gRPC agent is\n\
             enabled (ssh server v2 + netconf-yang agent ssh, or grpc)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: CoreError,
    },

    // ── Authentication ──────────────────────────────────────────────
    #[error("Authentication failed for environment '{environment}'")]
    #[diagnostic(
        code(xrconf::auth_failed),
        help("Verify the username/password in ~/.xrconf.toml or XRCONF_PASSWORD.")
    )]
    AuthFailed {
        environment: String,
        #[source]
        source: CoreError,
    },

    #[error("No credentials configured for environment '{environment}'")]
    #[diagnostic(
        code(xrconf::no_credentials),
        help(
            "Add username/password to the environment in ~/.xrconf.toml,\n\
             or set XRCONF_USERNAME and XRCONF_PASSWORD."
        )
    )]
    NoCredentials { environment: String },

    // ── Device rejection ────────────────────────────────────────────
    #[error("The device rejected '{rejected_input}'")]
    #[diagnostic(code(xrconf::rejected))]
    Rejected {
        rejected_input: String,
        #[help]
        error: String,
    },

    // ── Timeout ─────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(xrconf::timeout),
        help("Check device responsiveness; large operational reads can be slow.")
    )]
    Timeout { message: String },

    // ── Validation / usage ──────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(xrconf::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid document: {message}")]
    #[diagnostic(
        code(xrconf::document),
        help("NETCONF payloads must be XML subtrees; gRPC payloads YANG-JSON.")
    )]
    Document { message: String },

    // ── Configuration ───────────────────────────────────────────────
    #[error("No environment named '{name}' is configured")]
    #[diagnostic(
        code(xrconf::unknown_environment),
        help("Define [environments.{name}.netconf] or .grpc in ~/.xrconf.toml.")
    )]
    UnknownEnvironment { name: String },

    #[error(transparent)]
    #[diagnostic(code(xrconf::config))]
    Config(ConfigError),

    // ── Everything else ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(xrconf::device))]
    Device { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Document { .. } | Self::UnknownEnvironment { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Attribute a `CoreError` to the environment it occurred against.
    pub fn from_core(err: CoreError, environment: &str) -> Self {
        match err {
            CoreError::Connection { .. } => Self::ConnectionFailed { source: err },
            CoreError::Authentication { .. } => Self::AuthFailed {
                environment: environment.to_owned(),
                source: err,
            },
            CoreError::Rejected {
                rejected_input,
                error,
            } => Self::Rejected {
                rejected_input,
                error,
            },
            CoreError::InvalidDocument { .. } | CoreError::UnsupportedShape { .. } => {
                Self::Document {
                    message: err.to_string(),
                }
            }
            CoreError::BadArgument { message } => Self::Validation {
                field: "arguments".into(),
                reason: message,
            },
            CoreError::Transport(message) if message.contains("timed out") => {
                Self::Timeout { message }
            }
            CoreError::Transport(message) => Self::Device { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownEnvironment { name } => Self::UnknownEnvironment { name },
            ConfigError::NoCredentials { name } => Self::NoCredentials { environment: name },
            other => Self::Config(other),
        }
    }
}
