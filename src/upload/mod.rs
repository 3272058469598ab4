//! Upload of embedded Maven artifacts to an artifact repository.
//!
//! A product tarball ships a Maven repository archive. Both are unpacked
//! into a scratch directory and every `.jar` and `.pom` found in the Maven
//! layout is deployed, keeping its repository-relative path.

mod archive;
mod artifactory;

pub use archive::{collect_artifacts, extract_tarball, locate_maven_archive, maven_root};
pub use artifactory::{ArtifactoryClient, Checksums};

use crate::error::{ReleaseError, Result, UploadError};
use std::path::{Path, PathBuf};
use url::Url;

/// Artifact deployed by [`upload_product_jars`]
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    /// Path relative to the Maven repository root
    pub path: PathBuf,
    /// Deployed URL
    pub url: Url,
    /// Size in bytes
    pub size: u64,
}

/// Summary of an upload run
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    /// Artifacts in deploy order
    pub artifacts: Vec<UploadedArtifact>,
}

impl UploadReport {
    /// Total bytes deployed
    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.size).sum()
    }
}

/// Deploy the jars embedded in `tarball_path` through `client`.
///
/// `mvn_repository` names the Maven repository archive inside the tarball.
pub async fn upload_product_jars(
    tarball_path: &Path,
    mvn_repository: &str,
    client: &ArtifactoryClient,
) -> Result<UploadReport> {
    let scratch = tempfile::tempdir()?;
    let product_dir = scratch.path().join("product");
    let maven_dir = scratch.path().join("maven");

    let maven_archive = {
        let tarball = tarball_path.to_path_buf();
        let product_dir = product_dir.clone();
        let maven_dir = maven_dir.clone();
        let mvn_repository = mvn_repository.to_string();

        tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            extract_tarball(&tarball, &product_dir)?;
            let archive = locate_maven_archive(&product_dir, &mvn_repository).ok_or_else(|| {
                ReleaseError::Upload(UploadError::MavenRepositoryNotFound {
                    name: mvn_repository.clone(),
                    tarball: tarball.clone(),
                })
            })?;
            extract_tarball(&archive, &maven_dir)?;
            Ok(archive)
        })
        .await
        .map_err(|e| {
            ReleaseError::Upload(UploadError::ExtractionFailed {
                path: tarball_path.to_path_buf(),
                reason: format!("Extraction task failed: {}", e),
            })
        })??
    };
    log::info!("Maven repository archive: {}", maven_archive.display());

    let root = maven_root(&maven_dir);
    let artifacts = collect_artifacts(&root);
    if artifacts.is_empty() {
        log::warn!("No jar or pom files found in {}", maven_archive.display());
    }

    let mut report = UploadReport::default();
    for relative in artifacts {
        let data = tokio::fs::read(root.join(&relative)).await?;
        let size = data.len() as u64;

        log::info!("Uploading {}", relative.display());
        let url = client.deploy(&relative, data).await?;

        report.artifacts.push(UploadedArtifact {
            path: relative,
            url,
            size,
        });
    }

    Ok(report)
}
