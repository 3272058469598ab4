//! Validate-name command implementation.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{NamingError, ReleaseError, Result};
use crate::naming::is_valid_product_name;

/// Execute validate-name command
pub(super) fn execute_validate_name(args: &Args, config: &RuntimeConfig) -> Result<()> {
    if let Command::ValidateName { name } = &args.command {
        if !is_valid_product_name(name) {
            return Err(ReleaseError::Naming(NamingError::InvalidProductName {
                name: name.clone(),
            }));
        }
        config.success_println(&format!("Valid tarball name: {}", name));
    } else {
        unreachable!("execute_validate_name called with non-ValidateName command");
    }

    Ok(())
}
