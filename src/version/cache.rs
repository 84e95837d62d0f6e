use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::version::error::FetchError;
use crate::version::types::RemoteTagSet;

type Slot = Arc<OnceCell<Arc<RemoteTagSet>>>;

/// Process-wide cache of remote tag sets, keyed by canonical repository URL
///
/// Entries are created on first successful fetch and never invalidated.
/// Each URL owns a once-cell, so concurrent lookups of the same repository
/// share a single in-flight fetch; a failed fetch leaves the slot empty.
#[derive(Debug, Default)]
pub struct TagCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, url: &str) -> Slot {
        self.lock_slots().entry(url.to_string()).or_default().clone()
    }

    /// Get the cached tag set for `url`, if it was fetched successfully
    pub fn get(&self, url: &str) -> Option<Arc<RemoteTagSet>> {
        self.lock_slots()
            .get(url)
            .and_then(|slot| slot.get().cloned())
    }

    /// Get the tag set for `url`, running `fetch` only when it is not cached yet
    pub async fn get_or_try_insert_with<F, Fut>(
        &self,
        url: &str,
        fetch: F,
    ) -> Result<Arc<RemoteTagSet>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<RemoteTagSet>, FetchError>>,
    {
        let slot = self.slot(url);
        if let Some(tags) = slot.get() {
            debug!("Cache hit for {}", url);
            return Ok(tags.clone());
        }

        slot.get_or_try_init(fetch).await.cloned()
    }

    /// Number of repositories with a cached tag set
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::error::TransportError;
    use crate::version::semver::Tag;

    const URL: &str = "https://github.com/org/repo.git";

    fn tag_set(url: &str, tags: &[&str]) -> Arc<RemoteTagSet> {
        Arc::new(RemoteTagSet::new(
            url,
            tags.iter().map(|t| Tag::parse(t).unwrap()).collect(),
        ))
    }

    #[tokio::test]
    async fn get_or_try_insert_with_fetches_once() {
        let cache = TagCache::new();

        let first = cache
            .get_or_try_insert_with(URL, || async { Ok(tag_set(URL, &["v1.0.0"])) })
            .await
            .unwrap();
        let second = cache
            .get_or_try_insert_with(URL, || async { Ok(tag_set(URL, &["v9.9.9"])) })
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.latest().map(|t| t.name.as_str()), Some("v1.0.0"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_cache_unpopulated() {
        let cache = TagCache::new();

        let result = cache
            .get_or_try_insert_with(URL, || async {
                Err(FetchError::Transport(TransportError::Remote {
                    url: URL.to_string(),
                    message: "boom".to_string(),
                }))
            })
            .await;

        assert!(result.is_err());
        assert!(cache.get(URL).is_none());
        assert!(cache.is_empty());

        let retried = cache
            .get_or_try_insert_with(URL, || async { Ok(tag_set(URL, &["v2.0.0"])) })
            .await
            .unwrap();
        assert_eq!(retried.latest().map(|t| t.name.as_str()), Some("v2.0.0"));
    }

    #[tokio::test]
    async fn entries_are_keyed_by_url() {
        let cache = TagCache::new();
        let other = "https://github.com/org/other.git";

        cache
            .get_or_try_insert_with(URL, || async { Ok(tag_set(URL, &["v1.0.0"])) })
            .await
            .unwrap();
        cache
            .get_or_try_insert_with(other, || async { Ok(tag_set(other, &["v9.0.0"])) })
            .await
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get(other).and_then(|s| s.latest().cloned()).map(|t| t.name),
            Some("v9.0.0".to_string())
        );
    }
}
