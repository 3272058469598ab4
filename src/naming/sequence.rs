//! Patch succession checks against published tags.

use super::{get_patch_version, is_valid_release_version};
use crate::error::{NamingError, Result};
use crate::tags::TagSource;

/// Fetch the tags of `owner/project` belonging to `<product>-<version>`.
pub async fn get_product_tags<S: TagSource>(
    source: &S,
    owner: &str,
    project: &str,
    product_name: &str,
    product_version: &str,
) -> Result<Vec<String>> {
    let prefix = format!("{}-{}", product_name, product_version);
    let tags = source.list_tags(owner, project).await?;

    Ok(tags
        .into_iter()
        .filter(|tag| tag.starts_with(&prefix))
        .collect())
}

/// Highest patch number among `published`, or `None` when no release is published.
///
/// Tags that are not release versions are skipped.
///
/// # Errors
///
/// [`NamingError::InvalidPatch`] if a tag shaped like a release version has a
/// patch number that cannot be read.
pub fn last_published_patch<T: AsRef<str>>(
    published: &[T],
) -> std::result::Result<Option<u64>, NamingError> {
    let mut last = None;
    for tag in published.iter().map(AsRef::as_ref) {
        if !is_valid_release_version(tag) {
            log::debug!("Ignoring published tag '{}': not a release version", tag);
            continue;
        }
        let patch = get_patch_version(tag)?;
        last = last.max(Some(patch));
    }
    Ok(last)
}

/// Check that `candidate` is exactly one patch above the last published release.
///
/// With no published release the candidate must be patch 0.
///
/// # Errors
///
/// [`NamingError`] if `candidate` is not a valid release version, or if a
/// published release version has an unreadable patch number.
pub fn is_next_patch<T: AsRef<str>>(published: &[T], candidate: &str) -> std::result::Result<bool, NamingError> {
    if !is_valid_release_version(candidate) {
        return Err(NamingError::InvalidReleaseVersion {
            version: candidate.to_string(),
        });
    }

    let new_patch = get_patch_version(candidate)?;
    let expected = match last_published_patch(published)? {
        Some(last) => last.checked_add(1),
        None => Some(0),
    };

    Ok(expected == Some(new_patch))
}

/// Check that `release_version` is the legitimate next release of
/// `<product_name>-<product_version>` given the tags of `owner/project`.
pub async fn check_next_release_name<S: TagSource>(
    source: &S,
    owner: &str,
    project: &str,
    product_name: &str,
    product_version: &str,
    release_version: &str,
) -> Result<bool> {
    let related_tags =
        get_product_tags(source, owner, project, product_name, product_version).await?;

    let valid = is_next_patch(&related_tags, release_version)?;
    if !valid {
        log::warn!("Invalid release name: {}", release_version);
    }
    Ok(valid)
}
