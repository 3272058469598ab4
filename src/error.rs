//! Comprehensive error types for central_uploader operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for central_uploader operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all central_uploader operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Tarball / release name errors
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Release promotion errors
    #[error("Promotion error: {0}")]
    Promotion(#[from] PromotionError),

    /// Tag service errors
    #[error("Tag service error: {0}")]
    Service(#[from] ServiceError),

    /// Artifact upload errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when a string does not have the required release shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// Tarball filename does not match the product pattern
    #[error("Invalid product name: '{name}'")]
    InvalidProductName {
        /// Offending filename
        name: String,
    },

    /// Release version does not match the release version pattern
    #[error("The release version '{version}' is not valid")]
    InvalidReleaseVersion {
        /// Offending version string
        version: String,
    },

    /// Trailing `ubuntuN` segment could not be read as a patch number
    #[error("Could not read patch number from '{version}': segment '{segment}' is not ubuntu<N>")]
    InvalidPatch {
        /// Release version
        version: String,
        /// Last `-` separated segment
        segment: String,
    },
}

/// Release promotion errors
#[derive(Error, Debug)]
pub enum PromotionError {
    /// Release folder has no file matching the tarball pattern
    #[error("No file matching '{pattern}' found in release folder {folder}")]
    MissingArtifact {
        /// Folder that was inspected
        folder: PathBuf,
        /// Tarball glob pattern
        pattern: String,
    },

    /// Candidate patch number does not follow the last published one
    #[error("Release '{version}' is not the next release in sequence (found in {folder})")]
    InvalidReleaseSequence {
        /// Candidate release version
        version: String,
        /// Folder holding the candidate
        folder: PathBuf,
    },

    /// Output directory missing or not a directory
    #[error("Output directory {path} does not exist or is not a directory")]
    OutputDirectoryNotFound {
        /// Path that was given
        path: PathBuf,
    },
}

/// Tag service (GitHub API) errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport level failure
    #[error("Request to {url} failed: {reason}")]
    RequestFailed {
        /// Requested URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// Service answered with a non-success status
    #[error("Request to {url} returned status {status}")]
    UnexpectedStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body is not the expected JSON document
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse {
        /// Requested URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// Listing did not end within the page limit
    #[error("Tag listing for {repository} exceeded {pages} pages")]
    Truncated {
        /// `owner/project`
        repository: String,
        /// Pages fetched before giving up
        pages: usize,
    },
}

/// Artifact repository upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    /// Tarball could not be opened or unpacked
    #[error("Failed to extract {path}: {reason}")]
    ExtractionFailed {
        /// Archive path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Archive entry would be written outside the destination
    #[error("Archive {archive} contains unsafe entry path '{entry}'")]
    UnsafeEntry {
        /// Archive path
        archive: PathBuf,
        /// Offending entry
        entry: String,
    },

    /// Maven repository archive not present in the tarball
    #[error("Maven repository archive '{name}' not found in {tarball}")]
    MavenRepositoryNotFound {
        /// Expected archive path inside the tarball
        name: String,
        /// Product tarball
        tarball: PathBuf,
    },

    /// Artifact repository URL could not be built
    #[error("Invalid artifact repository URL '{url}': {reason}")]
    InvalidUrl {
        /// URL or URL fragment
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// Transport level failure
    #[error("Upload of {artifact} failed: {reason}")]
    RequestFailed {
        /// Artifact relative path
        artifact: String,
        /// Reason for the error
        reason: String,
    },

    /// Repository refused the artifact
    #[error("Upload of {artifact} rejected with status {status}")]
    Rejected {
        /// Artifact relative path
        artifact: String,
        /// HTTP status code
        status: u16,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Naming(NamingError::InvalidProductName { .. }) => vec![
                "Expected <product>-<X.Y.Z>-<qualifier>-ubuntu<N>-<YYYYMMDDHHMMSS><ext>".to_string(),
                "Check that the patch number has no leading zero and no hyphen after 'ubuntu'"
                    .to_string(),
            ],
            ReleaseError::Promotion(PromotionError::MissingArtifact { folder, pattern }) => vec![
                format!("Inspect {} for a file matching '{}'", folder.display(), pattern),
                "Re-run the download step or remove the incomplete folder".to_string(),
            ],
            ReleaseError::Promotion(PromotionError::InvalidReleaseSequence { version, .. }) => {
                vec![
                    format!(
                        "Compare '{}' with the latest published tag for its product and version",
                        version
                    ),
                    "Patch numbers start at ubuntu0 and must increase by exactly one".to_string(),
                ]
            }
            ReleaseError::Service(ServiceError::UnexpectedStatus { status: 403, .. })
            | ReleaseError::Service(ServiceError::UnexpectedStatus { status: 429, .. }) => vec![
                "GitHub API rate limit reached: set GH_TOKEN or GITHUB_TOKEN".to_string(),
                "Wait for the rate limit window to reset and retry".to_string(),
            ],
            ReleaseError::Service(ServiceError::UnexpectedStatus { status: 404, .. }) => vec![
                "Verify --repository-owner and --project-name".to_string(),
                "Private repositories require a token in GH_TOKEN or GITHUB_TOKEN".to_string(),
            ],
            ReleaseError::Service(ServiceError::Truncated { repository, .. }) => vec![
                format!("Prune obsolete tags in {}", repository),
                "Raise the page limit if the repository legitimately holds this many tags"
                    .to_string(),
            ],
            ReleaseError::Upload(UploadError::Rejected { status: 401, .. })
            | ReleaseError::Upload(UploadError::Rejected { status: 403, .. }) => vec![
                "Check the Artifactory username and password".to_string(),
                "Verify the account has deploy permissions on the target repository".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ReleaseError::Naming(_)
                | ReleaseError::Promotion(PromotionError::InvalidReleaseSequence { .. })
                | ReleaseError::Upload(UploadError::UnsafeEntry { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_input_is_not_recoverable() {
        let naming: ReleaseError = NamingError::InvalidProductName {
            name: "spark.tgz".to_string(),
        }
        .into();
        assert!(!naming.is_recoverable());

        let sequence: ReleaseError = PromotionError::InvalidReleaseSequence {
            version: "spark-3.4.1-bin-ubuntu2".to_string(),
            folder: "out/spark".into(),
        }
        .into();
        assert!(!sequence.is_recoverable());
    }

    #[test]
    fn test_service_failures_are_recoverable() {
        let err: ReleaseError = ServiceError::UnexpectedStatus {
            url: "https://api.github.com/repos/o/p/tags".to_string(),
            status: 429,
        }
        .into();
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestions()[0].contains("rate limit"));

        let truncated: ReleaseError = ServiceError::Truncated {
            repository: "o/p".to_string(),
            pages: 100,
        }
        .into();
        assert!(truncated.is_recoverable());
        assert!(truncated.to_string().contains("o/p exceeded 100 pages"));
    }
}
