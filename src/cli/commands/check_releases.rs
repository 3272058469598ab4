//! Check-releases command implementation.
//!
//! Runs the promotion scan over a directory of downloaded releases, deleting
//! the ones already published.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::promotion::ReleaseScanner;
use crate::tags::{CachedTagSource, GitHubTagClient};

/// Execute check-releases command
pub(super) async fn execute_check_releases(args: &Args, config: &RuntimeConfig) -> Result<()> {
    if let Command::CheckReleases {
        output_directory,
        tarball_pattern,
        repository_owner,
        project_name,
    } = &args.command
    {
        let scanner = ReleaseScanner::new(
            output_directory,
            tarball_pattern,
            repository_owner,
            project_name,
        )?;
        let tags = CachedTagSource::new(GitHubTagClient::new(config.env())?);

        config.info_println(&format!(
            "Checking {} against tags of {}/{}",
            output_directory.display(),
            repository_owner,
            project_name
        ));
        let report = scanner.scan(&tags).await?;

        if !report.deleted.is_empty() {
            config.println(&format!(
                "Removed {} already published release(s):",
                report.deleted.len()
            ));
            for folder in &report.deleted {
                config.indent(&folder.display().to_string());
            }
        }

        if report.eligible.is_empty() {
            config.warning_println("No new release to publish");
        } else {
            config.println(&format!(
                "{} release(s) ready to publish:",
                report.eligible.len()
            ));
            for release in &report.eligible {
                config.indent(&format!("{} ({})", release.version, release.tarball.display()));
            }
        }

        config.success_println("Release check completed");
    } else {
        unreachable!("execute_check_releases called with non-CheckReleases command");
    }

    Ok(())
}
