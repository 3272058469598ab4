//! Get-version command implementation.
//!
//! Prints the release version derived from a tarball name.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::naming::get_version_from_tarball_name;

/// Execute get-version command
pub(super) fn execute_get_version(args: &Args, config: &RuntimeConfig) -> Result<()> {
    if let Command::GetVersion { name } = &args.command {
        let version = get_version_from_tarball_name(name)?;
        config.output().result(&version)?;
    } else {
        unreachable!("execute_get_version called with non-GetVersion command");
    }

    Ok(())
}
