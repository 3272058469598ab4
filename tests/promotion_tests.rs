use central_uploader::error::{PromotionError, ReleaseError, Result, ServiceError};
use central_uploader::promotion::ReleaseScanner;
use central_uploader::tags::{CachedTagSource, TagSource};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

const OWNER: &str = "canonical";
const PROJECT: &str = "central-uploader";
const PATTERN: &str = "*.tgz";

struct StaticTags {
    tags: Vec<String>,
    calls: AtomicUsize,
}

impl StaticTags {
    fn new(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TagSource for StaticTags {
    async fn list_tags(&self, owner: &str, project: &str) -> Result<Vec<String>> {
        assert_eq!(owner, OWNER);
        assert_eq!(project, PROJECT);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tags.clone())
    }
}

struct FailingTags;

impl TagSource for FailingTags {
    async fn list_tags(&self, _owner: &str, _project: &str) -> Result<Vec<String>> {
        Err(ReleaseError::Service(ServiceError::UnexpectedStatus {
            url: "https://api.github.com/repos/canonical/central-uploader/tags".to_string(),
            status: 502,
        }))
    }
}

fn release_folder(root: &Path, folder: &str, files: &[&str]) {
    let dir = root.join(folder);
    std::fs::create_dir_all(&dir).unwrap();
    for file in files {
        std::fs::write(dir.join(file), b"content").unwrap();
    }
}

fn scanner(root: &Path) -> ReleaseScanner {
    ReleaseScanner::new(root, PATTERN, OWNER, PROJECT).unwrap()
}

#[tokio::test]
async fn test_published_folders_deleted_and_next_release_kept() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "spark-3.4",
        &[
            "spark-3.4.1-bin-ubuntu0-20230821132449.tgz",
            "spark-3.4.1-bin-ubuntu0-20230821132449.tgz.sha512",
            "build.log",
        ],
    );
    release_folder(
        dir.path(),
        "opensearch-2.9",
        &["opensearch-2.9.0-linux-x64-ubuntu0-20230821132449.tgz"],
    );
    release_folder(
        dir.path(),
        "spark-3.3",
        &["spark-3.3.1-bin-ubuntu2-20231201152409.tgz"],
    );

    let tags = StaticTags::new(&[
        "spark-3.4.1-bin-ubuntu0",
        "spark-3.3.1-bin-ubuntu0",
        "spark-3.3.1-bin-ubuntu1",
        "kafka-3.5.0-ubuntu4",
    ]);

    let report = scanner(dir.path()).scan(&tags).await.unwrap();

    assert_eq!(report.deleted, vec![dir.path().join("spark-3.4")]);
    assert!(!dir.path().join("spark-3.4").exists());

    let versions: Vec<&str> = report.eligible.iter().map(|r| r.version.as_str()).collect();
    assert_eq!(
        versions,
        vec!["opensearch-2.9.0-linux-x64-ubuntu0", "spark-3.3.1-bin-ubuntu2"]
    );
    assert!(dir.path().join("opensearch-2.9").exists());
    assert!(dir.path().join("spark-3.3").exists());
    assert_eq!(
        report.eligible[1].tarball,
        dir.path()
            .join("spark-3.3")
            .join("spark-3.3.1-bin-ubuntu2-20231201152409.tgz")
    );
}

#[tokio::test]
async fn test_rerun_after_cleanup_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "a",
        &["spark-3.4.1-bin-ubuntu0-20230821132449.tgz"],
    );
    release_folder(
        dir.path(),
        "b",
        &["spark-3.4.1-bin-ubuntu1-20230822132449.tgz"],
    );

    let tags = StaticTags::new(&["spark-3.4.1-bin-ubuntu0", "spark-3.4.1-bin-ubuntu1"]);

    let first = scanner(dir.path()).scan(&tags).await.unwrap();
    assert_eq!(first.deleted.len(), 2);
    assert!(first.eligible.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let second = scanner(dir.path()).scan(&tags).await.unwrap();
    assert!(second.deleted.is_empty());
    assert!(second.eligible.is_empty());
}

#[tokio::test]
async fn test_out_of_sequence_release_stops_scan() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "a",
        &["spark-3.4.1-bin-ubuntu0-20230821132449.tgz"],
    );
    release_folder(
        dir.path(),
        "b",
        &["spark-3.4.1-bin-ubuntu2-20230821132449.tgz"],
    );
    release_folder(
        dir.path(),
        "c",
        &["spark-3.3.1-bin-ubuntu0-20230821132449.tgz"],
    );

    let tags = StaticTags::new(&["spark-3.4.1-bin-ubuntu0", "spark-3.3.1-bin-ubuntu0"]);

    let err = scanner(dir.path()).scan(&tags).await.unwrap_err();
    match err {
        ReleaseError::Promotion(PromotionError::InvalidReleaseSequence { version, folder }) => {
            assert_eq!(version, "spark-3.4.1-bin-ubuntu2");
            assert_eq!(folder, dir.path().join("b"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Classified before the failure: deleted. At and after it: untouched.
    assert!(!dir.path().join("a").exists());
    assert!(dir.path().join("b").exists());
    assert!(dir.path().join("c").exists());
}

#[tokio::test]
async fn test_first_release_must_be_patch_zero() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "spark",
        &["spark-3.4.1-bin-ubuntu1-20230821132449.tgz"],
    );

    let tags = StaticTags::new(&[]);
    let err = scanner(dir.path()).scan(&tags).await.unwrap_err();
    assert!(matches!(
        err,
        ReleaseError::Promotion(PromotionError::InvalidReleaseSequence { .. })
    ));
}

#[tokio::test]
async fn test_several_matching_tarballs_uses_lexically_first() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "spark",
        &[
            "spark-3.4.1-bin-ubuntu1-20230821132449.tgz",
            "spark-3.4.1-bin-ubuntu0-20230821132449.tgz",
        ],
    );

    let tags = StaticTags::new(&[]);
    let report = scanner(dir.path()).scan(&tags).await.unwrap();

    assert_eq!(report.eligible.len(), 1);
    assert_eq!(report.eligible[0].version.as_str(), "spark-3.4.1-bin-ubuntu0");
    assert_eq!(
        report.eligible[0].tarball,
        dir.path()
            .join("spark")
            .join("spark-3.4.1-bin-ubuntu0-20230821132449.tgz")
    );
}

#[tokio::test]
async fn test_huge_published_patch_blocks_patch_zero() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "spark",
        &["spark-3.4.1-bin-ubuntu0-20230821132449.tgz"],
    );

    let tags = StaticTags::new(&["spark-3.4.1-bin-ubuntu4294967296"]);
    let err = scanner(dir.path()).scan(&tags).await.unwrap_err();
    assert!(matches!(
        err,
        ReleaseError::Promotion(PromotionError::InvalidReleaseSequence { .. })
    ));
    assert!(dir.path().join("spark").exists());
}

#[tokio::test]
async fn test_missing_artifact_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "a",
        &["spark-3.4.1-bin-ubuntu0-20230821132449.tgz"],
    );
    release_folder(dir.path(), "b", &["checksums.sha512", "build.log"]);

    let tags = StaticTags::new(&["spark-3.4.1-bin-ubuntu0"]);
    let err = scanner(dir.path()).scan(&tags).await.unwrap_err();

    match err {
        ReleaseError::Promotion(PromotionError::MissingArtifact { folder, pattern }) => {
            assert_eq!(folder, dir.path().join("b"));
            assert_eq!(pattern, PATTERN);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("a").exists());
    assert!(dir.path().join("b").exists());
}

#[tokio::test]
async fn test_invalid_tarball_name_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "a",
        &["spark-3.4-bin-ubuntu-1-20230821132449.tgz"],
    );

    let tags = StaticTags::new(&[]);
    let err = scanner(dir.path()).scan(&tags).await.unwrap_err();
    assert!(matches!(err, ReleaseError::Naming(_)));
    assert!(dir.path().join("a").exists());
}

#[tokio::test]
async fn test_service_failure_is_fatal_and_deletes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "a",
        &["spark-3.4.1-bin-ubuntu0-20230821132449.tgz"],
    );

    let err = scanner(dir.path()).scan(&FailingTags).await.unwrap_err();
    assert!(matches!(
        err,
        ReleaseError::Service(ServiceError::UnexpectedStatus { status: 502, .. })
    ));
    assert!(dir.path().join("a").exists());
}

#[tokio::test]
async fn test_files_in_output_directory_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README"), b"notes").unwrap();
    release_folder(
        dir.path(),
        "a",
        &["spark-3.4.1-bin-ubuntu0-20230821132449.tgz"],
    );

    let tags = StaticTags::new(&[]);
    let report = scanner(dir.path()).scan(&tags).await.unwrap();
    assert_eq!(report.eligible.len(), 1);
    assert!(dir.path().join("README").exists());
}

#[tokio::test]
async fn test_cached_source_queries_once_per_scan() {
    let dir = tempfile::tempdir().unwrap();
    release_folder(
        dir.path(),
        "a",
        &["spark-3.4.1-bin-ubuntu1-20230821132449.tgz"],
    );
    release_folder(
        dir.path(),
        "b",
        &["opensearch-2.9.0-linux-x64-ubuntu0-20230821132449.tgz"],
    );

    let tags = CachedTagSource::new(StaticTags::new(&["spark-3.4.1-bin-ubuntu0"]));
    let report = scanner(dir.path()).scan(&tags).await.unwrap();

    assert_eq!(report.eligible.len(), 2);
    assert_eq!(tags.into_inner().calls(), 1);
}

#[tokio::test]
async fn test_missing_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let err = scanner(&missing).scan(&StaticTags::new(&[])).await.unwrap_err();
    assert!(matches!(
        err,
        ReleaseError::Promotion(PromotionError::OutputDirectoryNotFound { .. })
    ));
}

#[test]
fn test_invalid_tarball_pattern() {
    let err = ReleaseScanner::new("/tmp", "[", OWNER, PROJECT).unwrap_err();
    assert!(matches!(err, ReleaseError::Cli(_)));
}
