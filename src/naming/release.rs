//! Validated release version type.

use super::{get_patch_version, get_version_from_tarball_name};
use crate::error::NamingError;
use std::fmt;

/// A release identifier of shape `<product>-<X.Y.Z>-<qualifier>-ubuntu<N>`.
///
/// Construction guarantees the string matches the release version pattern
/// and that its patch number can be read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    value: String,
    patch: u64,
}

impl ReleaseVersion {
    /// Parse and validate a release version string
    pub fn parse(version: &str) -> Result<Self, NamingError> {
        let patch = get_patch_version(version)?;
        Ok(Self {
            value: version.to_string(),
            patch,
        })
    }

    /// Derive the release version from a build tarball filename
    pub fn from_tarball_name(filename: &str) -> Result<Self, NamingError> {
        let version = get_version_from_tarball_name(filename)?;
        Self::parse(&version)
    }

    /// Full release version string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Product name, e.g. `spark`
    pub fn product(&self) -> &str {
        self.segment(0)
    }

    /// Product version, e.g. `3.4.1`
    pub fn product_version(&self) -> &str {
        self.segment(1)
    }

    /// `<product>-<version>`, the prefix shared by every tag of this release line
    pub fn prefix(&self) -> String {
        format!("{}-{}", self.product(), self.product_version())
    }

    /// Patch number read from the trailing `ubuntu<N>` segment
    pub fn patch(&self) -> u64 {
        self.patch
    }

    fn segment(&self, index: usize) -> &str {
        self.value.split('-').nth(index).unwrap_or_default()
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for ReleaseVersion {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
