mod cli;
mod commands;
mod error;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use xrconf_api::{Login, SessionOptions};
use xrconf_core::{ClientKind, Node};

use crate::cli::{Cli, GlobalOpts, Transport};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let (mut node, environment) = connect(&cli.global).await?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    let result = commands::dispatch(cli.command, &mut node, &environment, &cli.global).await;

    // Best-effort close; the command's own outcome wins.
    if let Err(e) = node.close().await {
        tracing::debug!(error = %e, "session close failed");
    }
    result
}

/// Resolve a login from the config file and CLI overrides, then connect.
async fn connect(global: &GlobalOpts) -> Result<(Node, String), CliError> {
    let settings = xrconf_config::load_settings()?;
    let environment = global
        .environment
        .clone()
        .unwrap_or_else(|| settings.default_environment_name().to_owned());

    let mut login = if global.host.is_some() {
        // Host on the command line: build the login from flags alone.
        Login {
            host: global.host.clone().unwrap_or_default(),
            port: default_port(global.transport),
            username: String::new(),
            password: SecretString::from(String::new()),
        }
    } else {
        match global.transport {
            Transport::Netconf => xrconf_config::netconf_login(&settings, &environment)?,
            Transport::Grpc => xrconf_config::grpc_login(&settings, &environment)?,
        }
    };

    if let Some(port) = global.port {
        login.port = port;
    }
    if let Some(ref username) = global.username {
        login.username = username.clone();
    }
    if let Some(ref password) = global.password {
        login.password = SecretString::from(password.clone());
    }
    if login.username.is_empty() {
        return Err(CliError::NoCredentials {
            environment: environment.clone(),
        });
    }

    let kind = match global.transport {
        Transport::Netconf => ClientKind::Netconf,
        Transport::Grpc => ClientKind::Grpc,
    };
    let options = SessionOptions {
        no_reconnect: global.no_reconnect,
    };

    let node = Node::connect(kind, login, options)
        .await
        .map_err(|e| CliError::from_core(e, &environment))?;
    Ok((node, environment))
}

fn default_port(transport: Transport) -> u16 {
    match transport {
        Transport::Netconf => xrconf_config::DEFAULT_NETCONF_PORT,
        Transport::Grpc => xrconf_config::DEFAULT_GRPC_PORT,
    }
}
