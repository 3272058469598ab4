//! Command execution functions.
//!
//! Each subcommand has its own executor returning `Result<()>`; this module
//! turns failures into a printed error, recovery suggestions and exit code 1.

mod check_releases;
mod get_version;
mod upload_jars;
mod validate_name;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use check_releases::execute_check_releases;
use get_version::execute_get_version;
use upload_jars::execute_upload_jars;
use validate_name::execute_validate_name;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    // Validate arguments
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(2);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::GetVersion { .. } => execute_get_version(&args, &config),
        Command::ValidateName { .. } => execute_validate_name(&args, &config),
        Command::CheckReleases { .. } => execute_check_releases(&args, &config).await,
        Command::UploadProductJars { .. } => execute_upload_jars(&args, &config).await,
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() && !config.output().is_quiet() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {}", suggestion));
                }
            }

            if !e.is_recoverable() {
                config.warning_println("Retrying will fail until the input is corrected");
            }

            Ok(1)
        }
    }
}
