//! Release promotion driver.
//!
//! The download stage leaves one folder per candidate release in an output
//! directory, each holding a build tarball plus auxiliary files. A scan
//! classifies every folder:
//!
//! - **already published**: the tarball's release version is already a tag.
//!   The folder is deleted at the end of the scan.
//! - **eligible**: the release version is the next patch in sequence. The
//!   folder is left for the publish step.
//!
//! Anything else stops the scan. Folders classified as published before the
//! failure are still deleted; later folders are not looked at.

use crate::error::{CliError, PromotionError, ReleaseError, Result};
use crate::naming::{ReleaseVersion, check_next_release_name, get_product_tags, get_version_from_tarball_name};
use crate::tags::TagSource;
use std::path::{Path, PathBuf};

/// Classification of a single release folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// Release version already has a tag; folder is stale
    AlreadyPublished {
        /// Release version found in the folder
        version: String,
    },
    /// Release version is the next one in sequence
    Eligible(EligibleRelease),
}

/// A candidate release cleared for publishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleRelease {
    /// Release folder
    pub folder: PathBuf,
    /// Tarball inside the folder
    pub tarball: PathBuf,
    /// Release version derived from the tarball name
    pub version: ReleaseVersion,
}

/// Result of a completed scan
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Folders removed because their release was already published
    pub deleted: Vec<PathBuf>,
    /// Folders left in place for publishing
    pub eligible: Vec<EligibleRelease>,
}

/// Scans an output directory of downloaded release folders
#[derive(Debug, Clone)]
pub struct ReleaseScanner {
    output_directory: PathBuf,
    tarball_pattern: glob::Pattern,
    repository_owner: String,
    project_name: String,
}

impl ReleaseScanner {
    /// Create a scanner.
    ///
    /// `tarball_pattern` is a shell glob matched against file names inside
    /// each release folder.
    pub fn new(
        output_directory: impl Into<PathBuf>,
        tarball_pattern: &str,
        repository_owner: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Result<Self> {
        let tarball_pattern = glob::Pattern::new(tarball_pattern).map_err(|e| {
            ReleaseError::Cli(CliError::InvalidArguments {
                reason: format!("Invalid tarball pattern '{}': {}", tarball_pattern, e),
            })
        })?;

        Ok(Self {
            output_directory: output_directory.into(),
            tarball_pattern,
            repository_owner: repository_owner.into(),
            project_name: project_name.into(),
        })
    }

    /// Classify every release folder, then delete the already published ones.
    pub async fn scan<S: TagSource + Sync>(&self, source: &S) -> Result<ScanReport> {
        log::info!("Analyzing directory: {}", self.output_directory.display());

        let folders = self.release_folders().await?;
        let mut to_delete = Vec::new();
        let mut eligible = Vec::new();
        let mut failure = None;

        for folder in folders {
            match self.classify(source, &folder).await {
                Ok(FolderOutcome::AlreadyPublished { version }) => {
                    log::info!("Release {} already published ({})", version, folder.display());
                    to_delete.push(folder);
                }
                Ok(FolderOutcome::Eligible(release)) => {
                    log::info!("Release {} is eligible ({})", release.version, folder.display());
                    eligible.push(release);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        let deletion = remove_folders(&to_delete).await;

        if let Some(e) = failure {
            if let Err(cleanup) = deletion {
                log::warn!("Cleanup after failed scan was incomplete: {}", cleanup);
            }
            return Err(e);
        }

        Ok(ScanReport {
            deleted: deletion?,
            eligible,
        })
    }

    /// Classify a single release folder without modifying it.
    pub async fn classify<S: TagSource + Sync>(
        &self,
        source: &S,
        folder: &Path,
    ) -> Result<FolderOutcome> {
        let tarball = self.find_tarball(folder).await?;
        let file_name = tarball
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let release_version = get_version_from_tarball_name(&file_name)?;
        let mut segments = release_version.split('-');
        let product_name = segments.next().unwrap_or_default();
        let product_version = segments.next().unwrap_or_default();

        let related_tags = get_product_tags(
            source,
            &self.repository_owner,
            &self.project_name,
            product_name,
            product_version,
        )
        .await?;

        if related_tags.iter().any(|tag| *tag == release_version) {
            return Ok(FolderOutcome::AlreadyPublished {
                version: release_version,
            });
        }

        let in_sequence = check_next_release_name(
            source,
            &self.repository_owner,
            &self.project_name,
            product_name,
            product_version,
            &release_version,
        )
        .await?;

        if !in_sequence {
            return Err(ReleaseError::Promotion(PromotionError::InvalidReleaseSequence {
                version: release_version,
                folder: folder.to_path_buf(),
            }));
        }

        Ok(FolderOutcome::Eligible(EligibleRelease {
            folder: folder.to_path_buf(),
            tarball,
            version: ReleaseVersion::parse(&release_version)?,
        }))
    }

    /// Release folders in the output directory, in lexical order
    async fn release_folders(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.output_directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReleaseError::Promotion(
                    PromotionError::OutputDirectoryNotFound {
                        path: self.output_directory.clone(),
                    },
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut folders = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if tokio::fs::metadata(&path).await?.is_dir() {
                folders.push(path);
            } else {
                log::warn!("Skipping non-directory entry: {}", path.display());
            }
        }

        folders.sort();
        Ok(folders)
    }

    /// First file in `folder` (lexical order) matching the tarball pattern
    async fn find_tarball(&self, folder: &Path) -> Result<PathBuf> {
        let mut entries = tokio::fs::read_dir(folder).await?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if self.tarball_pattern.matches(&name.to_string_lossy())
                && entry.file_type().await?.is_file()
            {
                candidates.push(entry.path());
            }
        }

        candidates.sort();
        if candidates.len() > 1 {
            log::warn!(
                "Several files in {} match '{}', using {} and ignoring {}",
                folder.display(),
                self.tarball_pattern.as_str(),
                candidates[0].display(),
                candidates[1..]
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        candidates.into_iter().next().ok_or_else(|| {
            ReleaseError::Promotion(PromotionError::MissingArtifact {
                folder: folder.to_path_buf(),
                pattern: self.tarball_pattern.as_str().to_string(),
            })
        })
    }
}

/// Recursively delete each folder, returning the ones removed
async fn remove_folders(folders: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::with_capacity(folders.len());
    for folder in folders {
        log::info!("Deleting folder: {}", folder.display());
        tokio::fs::remove_dir_all(folder).await?;
        removed.push(folder.clone());
    }
    Ok(removed)
}
