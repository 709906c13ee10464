//! `xrconf show` — run a CLI show command over gRPC.

use xrconf_core::Node;

use crate::cli::ShowArgs;
use crate::error::CliError;

pub async fn handle(node: &mut Node, args: ShowArgs, environment: &str) -> Result<(), CliError> {
    let output = node
        .show(&args.command)
        .await
        .map_err(|e| CliError::from_core(e, environment))?;

    match output {
        Some(output) if !output.trim().is_empty() => println!("{output}"),
        _ => eprintln!("(no output)"),
    }
    Ok(())
}
