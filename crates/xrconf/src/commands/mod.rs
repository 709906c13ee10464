//! Command dispatch: bridges CLI args to node operations.

pub mod get;
pub mod set;
pub mod show;
pub mod show_running;
pub mod util;

use xrconf_core::Node;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(
    cmd: Command,
    node: &mut Node,
    environment: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Get(args) => get::handle(node, args, environment).await,
        Command::Set(args) => set::handle(node, args, environment).await,
        Command::Show(args) => show::handle(node, args, environment).await,
        Command::ShowRunning(args) => show_running::handle(node, args, environment, global).await,
    }
}
