//! `xrconf get` — read configuration or operational data.

use xrconf_core::Node;

use super::util;
use crate::cli::GetArgs;
use crate::error::CliError;

pub async fn handle(node: &mut Node, args: GetArgs, environment: &str) -> Result<(), CliError> {
    let filter = util::payload_from(args.filter, args.file, "filter")?;

    let data = if args.oper {
        node.get_yang_oper(&filter).await
    } else {
        node.get_yang(&filter).await
    }
    .map_err(|e| CliError::from_core(e, environment))?;

    match data {
        Some(data) if !data.trim().is_empty() => println!("{data}"),
        _ => eprintln!("(no data returned)"),
    }
    Ok(())
}
