//! # Central Uploader
//!
//! Release-engineering helpers for packaged software builds.
//!
//! Build tarballs produced by CI carry their release identity in their file
//! name. This crate validates those names, derives the release version,
//! checks that a downloaded candidate is the next patch after the tags
//! already published, cleans up candidates that were already released, and
//! deploys the Maven artifacts a tarball embeds to an artifact repository.
//!
//! ## Usage
//!
//! ```bash
//! central_uploader get-version --name spark-3.4.1-bin-ubuntu1-20230821132449.tgz
//! central_uploader validate-name --name spark-3.4.1-bin-ubuntu1-20230821132449.tgz
//! central_uploader check-releases -o ./releases -t '*.tgz' -r canonical -p central-uploader
//! central_uploader upload-product-jars -t spark.tgz -r repository.tgz -a https://... -u user -z pass
//! ```
//!
//! ## Library
//!
//! ```
//! use central_uploader::naming::{get_patch_version, get_version_from_tarball_name};
//!
//! let version = get_version_from_tarball_name("spark-3.4.1-bin-ubuntu1-20230821132449.tgz").unwrap();
//! assert_eq!(version, "spark-3.4.1-bin-ubuntu1");
//! assert_eq!(get_patch_version(&version).unwrap(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod config;
pub mod error;
pub mod naming;
pub mod promotion;
pub mod tags;
pub mod upload;

// Re-export main types for public API
pub use cli::Args;
pub use config::EnvConfig;
pub use error::{NamingError, PromotionError, ReleaseError, Result, ServiceError, UploadError};
pub use naming::{
    ReleaseVersion, check_next_release_name, get_patch_version, get_version_from_tarball_name,
    is_valid_product_name, is_valid_release_version,
};
pub use promotion::{FolderOutcome, ReleaseScanner, ScanReport};
pub use tags::{CachedTagSource, GitHubTagClient, TagSource};
