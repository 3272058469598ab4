//! Tarball naming and release versioning rules.
//!
//! Build tarballs are named
//! `<product>-<X.Y.Z>-<qualifier>-ubuntu<N>-<YYYYMMDDHHMMSS><extension>`.
//! Stripping the timestamp and extension yields the release version
//! (`<product>-<X.Y.Z>-<qualifier>-ubuntu<N>`), which is also the name of the
//! source-control tag recorded once the release is published. `N` is the
//! patch number: it starts at 0 and grows by exactly one per published
//! release of the same product and version.
//!
//! Everything in this module is pure except [`get_product_tags`] and
//! [`check_next_release_name`], which query a [`TagSource`](crate::tags::TagSource).

mod release;
mod sequence;

pub use release::ReleaseVersion;
pub use sequence::{check_next_release_name, get_product_tags, is_next_patch, last_published_patch};

use crate::error::NamingError;
use regex::Regex;
use std::sync::LazyLock;

/// Pattern a tarball filename must match (anchored at the start only).
pub const PRODUCT_PATTERN: &str = r"^[a-z]*-[0-9][.][0-9][.][0-9]-.*-ubuntu(0|[1-9][0-9]*)-(20[0-9]{2})[01][1-9][0-3][1-9][01][0-9][0-5][0-9][0-5][0-9]\S*";

/// Build timestamp suffix; the first match is where a tarball name is split.
pub const TIMESTAMP_PATTERN: &str =
    r"-(20[0-9]{2})[01][1-9][0-3][1-9][01][0-9][0-5][0-9][0-5][0-9]\S*";

/// Pattern a release version must match (anchored at the start only).
pub const RELEASE_VERSION_PATTERN: &str = r"^[a-z]*-[0-9][.][0-9][.][0-9]-.*-ubuntu(0|[1-9][0-9]*)";

/// Literal token preceding the patch number.
pub const PATCH_TOKEN: &str = "ubuntu";

static PRODUCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRODUCT_PATTERN).expect("product pattern is valid"));

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern is valid"));

static RELEASE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RELEASE_VERSION_PATTERN).expect("release version pattern is valid"));

/// Check whether `name` is a well-formed build tarball filename.
///
/// Trailing content after the timestamp (the extension) is allowed.
pub fn is_valid_product_name(name: &str) -> bool {
    PRODUCT_RE.is_match(name)
}

/// Check whether `version` is a well-formed release version.
pub fn is_valid_release_version(version: &str) -> bool {
    RELEASE_VERSION_RE.is_match(version)
}

/// Derive the release version from a tarball filename.
///
/// The name is split at the *first* timestamp-shaped run and the part before
/// it is returned. A qualifier that itself contains a timestamp-shaped run
/// therefore truncates the result; callers see that as an invalid patch
/// further down the line.
///
/// # Errors
///
/// [`NamingError::InvalidProductName`] if `filename` fails [`is_valid_product_name`].
pub fn get_version_from_tarball_name(filename: &str) -> Result<String, NamingError> {
    if !is_valid_product_name(filename) {
        return Err(NamingError::InvalidProductName {
            name: filename.to_string(),
        });
    }

    // A valid product name always contains the timestamp.
    let split_at = TIMESTAMP_RE
        .find(filename)
        .map(|m| m.start())
        .ok_or_else(|| NamingError::InvalidProductName {
            name: filename.to_string(),
        })?;

    Ok(filename[..split_at].to_string())
}

/// Extract the patch number from the trailing `ubuntu<N>` segment.
///
/// # Errors
///
/// - [`NamingError::InvalidReleaseVersion`] if `version` fails [`is_valid_release_version`]
/// - [`NamingError::InvalidPatch`] if the last `-` segment is not `ubuntu<N>`
pub fn get_patch_version(version: &str) -> Result<u64, NamingError> {
    if !is_valid_release_version(version) {
        return Err(NamingError::InvalidReleaseVersion {
            version: version.to_string(),
        });
    }

    let segment = version.rsplit('-').next().unwrap_or(version);

    segment
        .strip_prefix(PATCH_TOKEN)
        .and_then(|digits| digits.parse::<u64>().ok())
        .ok_or_else(|| NamingError::InvalidPatch {
            version: version.to_string(),
            segment: segment.to_string(),
        })
}
