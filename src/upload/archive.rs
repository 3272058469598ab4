//! Tarball extraction and Maven artifact discovery.

use crate::error::{ReleaseError, Result, UploadError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// File extensions deployed to the artifact repository
pub const ARTIFACT_EXTENSIONS: &[&str] = &["jar", "pom"];

/// Extract a `.tar`, `.tar.gz` or `.tgz` archive into `dest`.
///
/// Compression is detected from the file header, not the extension. Entries
/// with absolute paths or `..` components abort the extraction.
pub fn extract_tarball(archive: &Path, dest: &Path) -> Result<()> {
    log::info!("Extracting {} to {}", archive.display(), dest.display());

    let extraction_failed = |reason: String| {
        ReleaseError::Upload(UploadError::ExtractionFailed {
            path: archive.to_path_buf(),
            reason,
        })
    };

    let mut magic = [0u8; 2];
    let gzipped = {
        let mut file = File::open(archive).map_err(|e| extraction_failed(e.to_string()))?;
        file.read_exact(&mut magic).is_ok() && magic == GZIP_MAGIC
    };

    let file = File::open(archive).map_err(|e| extraction_failed(e.to_string()))?;
    let reader: Box<dyn Read> = if gzipped {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    std::fs::create_dir_all(dest)?;
    let mut tar = tar::Archive::new(reader);
    let entries = tar.entries().map_err(|e| extraction_failed(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| extraction_failed(e.to_string()))?;
        let entry_path = entry
            .path()
            .map_err(|e| extraction_failed(e.to_string()))?
            .into_owned();

        if !is_safe_entry(&entry_path) {
            return Err(ReleaseError::Upload(UploadError::UnsafeEntry {
                archive: archive.to_path_buf(),
                entry: entry_path.display().to_string(),
            }));
        }

        entry
            .unpack_in(dest)
            .map_err(|e| extraction_failed(format!("{}: {}", entry_path.display(), e)))?;
    }

    Ok(())
}

fn is_safe_entry(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Find the Maven repository archive inside an extracted tarball.
///
/// `name` is first taken as a path relative to `root`; failing that, the
/// first file (lexical order) whose file name equals the last component of
/// `name` is used.
pub fn locate_maven_archive(root: &Path, name: &str) -> Option<PathBuf> {
    let direct = root.join(name.trim_start_matches("./"));
    if direct.is_file() {
        return Some(direct);
    }

    let file_name = Path::new(name).file_name()?;
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.into_path())
}

/// Root of an extracted Maven repository.
///
/// Archives commonly wrap the layout in a single `repository/` directory;
/// that wrapper is not part of the deployed paths.
pub fn maven_root(extracted: &Path) -> PathBuf {
    let children: Vec<_> = match std::fs::read_dir(extracted) {
        Ok(entries) => entries.filter_map(|e| e.ok()).collect(),
        Err(_) => return extracted.to_path_buf(),
    };

    if let [only] = children.as_slice()
        && only.file_name().to_str() == Some("repository")
        && only.path().is_dir()
    {
        return only.path();
    }
    extracted.to_path_buf()
}

/// Deployable artifacts under `root`, as paths relative to it, in lexical order.
pub fn collect_artifacts(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext))
        })
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}
