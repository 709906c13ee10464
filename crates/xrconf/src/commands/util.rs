//! Shared helpers for command handlers.

use std::path::PathBuf;

use crate::error::CliError;

/// Resolve a payload given either inline or as a file path.
pub fn payload_from(
    inline: Option<String>,
    file: Option<PathBuf>,
    what: &str,
) -> Result<String, CliError> {
    match (inline, file) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        _ => Err(CliError::Validation {
            field: what.into(),
            reason: format!("provide the {what} inline or with --file"),
        }),
    }
}
