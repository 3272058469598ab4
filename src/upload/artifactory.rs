//! Artifactory deploy client.

use crate::error::{ReleaseError, Result, UploadError};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Checksums Artifactory verifies on deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksums {
    /// Hex SHA-1
    pub sha1: String,
    /// Hex SHA-256
    pub sha256: String,
    /// Hex MD5
    pub md5: String,
}

impl Checksums {
    /// Hash `data` with every supported algorithm
    pub fn compute(data: &[u8]) -> Self {
        use sha2::Digest as _;

        let mut sha1 = sha1::Sha1::new();
        sha1.update(data);
        let mut sha256 = sha2::Sha256::new();
        sha256.update(data);

        Self {
            sha1: hex::encode(sha1.finalize()),
            sha256: hex::encode(sha256.finalize()),
            md5: format!("{:x}", md5::compute(data)),
        }
    }
}

/// Deploys files under a repository base URL with basic auth
#[derive(Debug, Clone)]
pub struct ArtifactoryClient {
    client: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl ArtifactoryClient {
    /// Create a client for `base_url` (a trailing slash is added if missing)
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| {
            ReleaseError::Upload(UploadError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ReleaseError::Upload(UploadError::RequestFailed {
                    artifact: base_url.to_string(),
                    reason: format!("Failed to build HTTP client: {}", e),
                })
            })?;

        Ok(Self {
            client,
            base_url,
            username: username.into(),
            password: password.into(),
        })
    }

    /// Target URL for an artifact path relative to the repository root
    pub fn artifact_url(&self, relative: &Path) -> Result<Url> {
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        self.base_url.join(&joined).map_err(|e| {
            ReleaseError::Upload(UploadError::InvalidUrl {
                url: joined.clone(),
                reason: e.to_string(),
            })
        })
    }

    /// PUT `data` at `relative`, returning the URL it was deployed to
    pub async fn deploy(&self, relative: &Path, data: Vec<u8>) -> Result<Url> {
        let url = self.artifact_url(relative)?;
        let artifact = relative.display().to_string();

        let (data, checksums) = tokio::task::spawn_blocking(move || {
            let checksums = Checksums::compute(&data);
            (data, checksums)
        })
        .await
        .map_err(|e| {
            ReleaseError::Upload(UploadError::RequestFailed {
                artifact: artifact.clone(),
                reason: format!("Checksum task failed: {}", e),
            })
        })?;

        log::debug!("PUT {} ({} bytes, sha1 {})", url, data.len(), checksums.sha1);

        let response = self
            .client
            .put(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header("X-Checksum-Sha1", &checksums.sha1)
            .header("X-Checksum-Sha256", &checksums.sha256)
            .header("X-Checksum-Md5", &checksums.md5)
            .body(data)
            .send()
            .await
            .map_err(|e| {
                ReleaseError::Upload(UploadError::RequestFailed {
                    artifact: artifact.clone(),
                    reason: e.to_string(),
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReleaseError::Upload(UploadError::Rejected {
                artifact,
                status: status.as_u16(),
            }));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksums_of_known_input() {
        let checksums = Checksums::compute(b"abc");
        assert_eq!(checksums.sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            checksums.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(checksums.md5, "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_artifact_url_keeps_repository_path() {
        let client = ArtifactoryClient::new(
            "https://artifacts.example.com/artifactory/maven-local",
            "user",
            "secret",
            Duration::from_secs(5),
        )
        .unwrap();

        let url = client
            .artifact_url(Path::new("org/example/lib/1.0/lib-1.0.jar"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://artifacts.example.com/artifactory/maven-local/org/example/lib/1.0/lib-1.0.jar"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ArtifactoryClient::new("not a url", "u", "p", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ReleaseError::Upload(UploadError::InvalidUrl { .. })));
    }
}
