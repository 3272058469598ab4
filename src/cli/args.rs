//! Command line argument parsing and validation.

use crate::config::EnvConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release-engineering services for packaged builds
#[derive(Parser, Debug)]
#[command(
    name = "central_uploader",
    version,
    about = "Services for the GitHub Central Uploader",
    long_about = "Validate build tarball names, check downloaded releases against published tags \
and upload embedded Maven artifacts.

Usage:
  central_uploader get-version --name spark-3.4.1-bin-ubuntu1-20230821132449.tgz
  central_uploader validate-name --name spark-3.4.1-bin-ubuntu1-20230821132449.tgz
  central_uploader check-releases -o ./releases -t '*.tgz' -r canonical -p central-uploader"
)]
pub struct Args {
    /// Suppress informational output (errors and results are still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Action to run
    #[command(subcommand)]
    pub command: Command,
}

/// Supported actions
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Retrieve software version from tarball name.
    GetVersion {
        /// The product name to be checked.
        #[arg(short, long)]
        name: String,
    },

    /// Validate the name of the tarball.
    ValidateName {
        /// Tarball file name.
        #[arg(short, long)]
        name: String,
    },

    /// Check if the name of the tarball is valid with respect to the published tarballs.
    CheckReleases {
        /// Path of the directory where releases are downloaded.
        #[arg(short, long)]
        output_directory: PathBuf,

        /// Tarball pattern name.
        #[arg(short, long)]
        tarball_pattern: String,

        /// Repository owner.
        #[arg(short, long)]
        repository_owner: String,

        /// Project name.
        #[arg(short, long)]
        project_name: String,
    },

    /// Upload jars contained in the tarball to artifactory.
    UploadProductJars {
        /// Tarball path.
        #[arg(short, long)]
        tarball_path: PathBuf,

        /// Maven repository archive path.
        #[arg(short = 'r', long)]
        mvn_repository: String,

        /// Artifactory url.
        #[arg(short, long, env = "ARTIFACTORY_URL")]
        artifactory_url: String,

        /// Artifactory username.
        #[arg(short = 'u', long, env = "ARTIFACTORY_USERNAME")]
        artifactory_username: String,

        /// Artifactory password.
        #[arg(short = 'z', long, env = "ARTIFACTORY_PASSWORD", hide_env_values = true)]
        artifactory_password: String,
    },
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetVersion { .. } => "get-version",
            Command::ValidateName { .. } => "validate-name",
            Command::CheckReleases { .. } => "check-releases",
            Command::UploadProductJars { .. } => "upload-product-jars",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::GetVersion { name } | Command::ValidateName { name } => {
                if name.trim().is_empty() {
                    return Err("--name must not be empty".to_string());
                }
            }
            Command::CheckReleases {
                tarball_pattern,
                repository_owner,
                project_name,
                ..
            } => {
                if tarball_pattern.is_empty() {
                    return Err("--tarball-pattern must not be empty".to_string());
                }
                if repository_owner.is_empty() || repository_owner.contains('/') {
                    return Err(format!(
                        "Invalid --repository-owner '{}'",
                        repository_owner
                    ));
                }
                if project_name.is_empty() || project_name.contains('/') {
                    return Err(format!("Invalid --project-name '{}'", project_name));
                }
            }
            Command::UploadProductJars {
                mvn_repository,
                artifactory_url,
                ..
            } => {
                if mvn_repository.is_empty() {
                    return Err("--mvn-repository must not be empty".to_string());
                }
                if !artifactory_url.starts_with("http://") && !artifactory_url.starts_with("https://")
                {
                    return Err(format!(
                        "--artifactory-url must be an http(s) URL, got '{}'",
                        artifactory_url
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
    /// Environment snapshot
    env: EnvConfig,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(quiet: bool, env: EnvConfig) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
            env,
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Get the environment snapshot
    pub fn env(&self) -> &EnvConfig {
        &self.env
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print informational message
    pub fn info_println(&self, message: &str) {
        let _ = self.output.info(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.quiet, EnvConfig::from_env())
    }
}
