//! `xrconf set` — apply configuration with reconciliation.
//!
//! Before writing, the target is compared against the device's current
//! config for the same subtree. An in-sync target is a no-op, which keeps
//! repeated applies idempotent and avoids needless candidate commits.

use tracing::info;
use xrconf_core::{ClientKind, Node};

use super::util;
use crate::cli::{SetArgs, WriteMode};
use crate::error::CliError;

pub async fn handle(node: &mut Node, args: SetArgs, environment: &str) -> Result<(), CliError> {
    let config = util::payload_from(args.config, args.file, "config")?;

    if !args.force {
        let insync = is_insync(node, args.mode, &config)
            .await
            .map_err(|e| CliError::from_core(e, environment))?;
        if insync {
            println!("Already in sync; nothing to apply.");
            return Ok(());
        }
        if args.check {
            println!("Out of sync; a {:?} would change the device.", args.mode);
            return Ok(());
        }
    }

    info!(mode = ?args.mode, "applying configuration");
    match args.mode {
        WriteMode::Merge => node.merge_yang(&config).await,
        WriteMode::Replace => node.replace_yang(&config).await,
        WriteMode::Delete => node.delete_yang(&config).await,
    }
    .map_err(|e| CliError::from_core(e, environment))?;

    println!("Applied.");
    Ok(())
}

/// Fetch the device's config for the target subtree and reconcile.
///
/// The target doubles as the retrieval filter: both transports accept the
/// full document as a subtree/path filter. A delete is in sync when the
/// subtree no longer returns data.
async fn is_insync(
    node: &mut Node,
    mode: WriteMode,
    config: &str,
) -> Result<bool, xrconf_core::CoreError> {
    let current = node.get_yang(config).await?.unwrap_or_default();

    match (mode, node.kind()) {
        (WriteMode::Delete, _) => Ok(current.trim().is_empty()),
        (WriteMode::Merge, ClientKind::Grpc) => {
            xrconf_core::insync_for_merge_json(config, &current)
        }
        (WriteMode::Replace, ClientKind::Grpc) => {
            xrconf_core::insync_for_replace_json(config, &current)
        }
        (WriteMode::Merge, ClientKind::Netconf) => {
            xrconf_core::insync_for_merge_xml(config, &current)
        }
        (WriteMode::Replace, ClientKind::Netconf) => {
            xrconf_core::insync_for_replace_xml(config, &current)
        }
    }
}
