//! Clap derive structures for the `xrconf` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// xrconf -- declarative YANG configuration for IOS-XR devices
#[derive(Debug, Parser)]
#[command(
    name = "xrconf",
    version,
    about = "Manage IOS-XR configuration over NETCONF or gRPC",
    long_about = "Reads and writes YANG-modeled configuration on IOS-XR devices.\n\n\
        Writes are reconciled against the running configuration first, so\n\
        applying a config the device already carries is a no-op.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device environment from the config file
    #[arg(long, short = 'e', env = "XRCONF_ENVIRONMENT", global = true)]
    pub environment: Option<String>,

    /// Transport to speak to the device
    #[arg(long, short = 't', default_value = "grpc", global = true)]
    pub transport: Transport,

    /// Device host (overrides the environment profile)
    #[arg(long, env = "XRCONF_HOST", global = true)]
    pub host: Option<String>,

    /// Device port (overrides the environment profile)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Username (overrides the environment profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Password (prefer XRCONF_PASSWORD or the config file)
    #[arg(long, env = "XRCONF_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Do not reconnect and retry when a NETCONF session drops mid-request
    #[arg(long, global = true)]
    pub no_reconnect: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// NETCONF over SSH (XML payloads)
    Netconf,
    /// EMS gRPC (YANG-JSON payloads)
    Grpc,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read configuration or operational data matching a filter
    Get(GetArgs),

    /// Apply configuration, skipping the write when already in sync
    Set(SetArgs),

    /// Run a CLI show command on the device (gRPC only)
    Show(ShowArgs),

    /// Dump current device state for every container in a set of YANG models
    ShowRunning(ShowRunningArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Filter: XML subtree (netconf) or YANG-JSON path (grpc).
    /// Reads from --file when omitted.
    pub filter: Option<String>,

    /// Read the filter from a file
    #[arg(long, short = 'f', conflicts_with = "filter")]
    pub file: Option<PathBuf>,

    /// Retrieve operational data instead of configuration
    #[arg(long, short = 'o')]
    pub oper: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Configuration payload: XML (netconf) or YANG-JSON (grpc).
    /// Reads from --file when omitted.
    pub config: Option<String>,

    /// Read the payload from a file
    #[arg(long, short = 'f', conflicts_with = "config")]
    pub file: Option<PathBuf>,

    /// Write mode
    #[arg(long, short = 'm', default_value = "merge")]
    pub mode: WriteMode,

    /// Apply without the in-sync reconciliation check
    #[arg(long)]
    pub force: bool,

    /// Report whether a change would be made, without applying it
    #[arg(long, conflicts_with = "force")]
    pub check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WriteMode {
    Merge,
    Replace,
    Delete,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// The show command to run, e.g. "show ip interface brief"
    pub command: String,
}

#[derive(Debug, Args)]
pub struct ShowRunningArgs {
    /// A .yang file or a directory of .yang files
    #[arg(default_value = "/pkg/yang")]
    pub path: PathBuf,

    /// Retrieve operational data instead of configuration
    #[arg(long, short = 'o')]
    pub oper: bool,
}
