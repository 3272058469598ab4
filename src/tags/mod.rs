//! Published tag lookup.
//!
//! Tags recorded in the source repository mark published releases; their
//! names are release versions. The naming rules only need the raw list and
//! apply their own filtering.

mod github;

pub use github::{GitHubTagClient, MAX_PAGES, PER_PAGE};

use crate::error::Result;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;

/// Source of published tag names for a repository
pub trait TagSource {
    /// Return every tag name of `owner/project`.
    ///
    /// An empty list means the repository has no tags. A failed lookup must
    /// be an error, never an empty list.
    fn list_tags(
        &self,
        owner: &str,
        project: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Memoises listings per repository.
///
/// Meant to live for a single scan: tags published while it is alive are
/// not observed.
pub struct CachedTagSource<S> {
    inner: S,
    cache: Mutex<HashMap<(String, String), Vec<String>>>,
}

impl<S: TagSource + Sync> CachedTagSource<S> {
    /// Wrap a tag source
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Unwrap the inner source
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TagSource + Sync + Send> TagSource for CachedTagSource<S> {
    async fn list_tags(&self, owner: &str, project: &str) -> Result<Vec<String>> {
        let key = (owner.to_string(), project.to_string());
        let mut cache = self.cache.lock().await;

        if let Some(tags) = cache.get(&key) {
            log::debug!("Using cached tags for {}/{}", owner, project);
            return Ok(tags.clone());
        }

        // Failures are not cached.
        let tags = self.inner.list_tags(owner, project).await?;
        cache.insert(key, tags.clone());
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReleaseError, ServiceError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl TagSource for Counting {
        async fn list_tags(&self, owner: &str, _project: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ReleaseError::Service(ServiceError::UnexpectedStatus {
                    url: owner.to_string(),
                    status: 500,
                }));
            }
            Ok(vec![format!("{owner}-tag")])
        }
    }

    #[tokio::test]
    async fn test_cache_hits_once_per_repository() {
        let source = CachedTagSource::new(Counting {
            calls: AtomicUsize::new(0),
            fail: false,
        });

        assert_eq!(source.list_tags("a", "p").await.unwrap(), vec!["a-tag"]);
        assert_eq!(source.list_tags("a", "p").await.unwrap(), vec!["a-tag"]);
        assert_eq!(source.list_tags("b", "p").await.unwrap(), vec!["b-tag"]);

        assert_eq!(source.into_inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_does_not_store_failures() {
        let source = CachedTagSource::new(Counting {
            calls: AtomicUsize::new(0),
            fail: true,
        });

        assert!(source.list_tags("a", "p").await.is_err());
        assert!(source.list_tags("a", "p").await.is_err());

        assert_eq!(source.into_inner().calls.load(Ordering::SeqCst), 2);
    }
}
