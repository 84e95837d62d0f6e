//! Remote tag resolution
//!
//! Combines a [`TagTransport`] with the shared [`TagCache`] so every repository
//! is listed at most once per run.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::version::cache::TagCache;
use crate::version::error::FetchError;
use crate::version::transport::TagTransport;
use crate::version::types::RemoteTagSet;

pub struct TagResolver {
    transport: Arc<dyn TagTransport>,
    cache: Arc<TagCache>,
}

impl TagResolver {
    pub fn new(transport: Arc<dyn TagTransport>, cache: Arc<TagCache>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &Arc<TagCache> {
        &self.cache
    }

    /// Resolve the tag set of the repository at `url`
    ///
    /// Returns the cached set when present; otherwise lists the remote, parses
    /// every tag and caches the result. Nothing is cached on failure.
    pub async fn resolve(&self, url: &str) -> Result<Arc<RemoteTagSet>, FetchError> {
        self.cache
            .get_or_try_insert_with(url, || async {
                info!("Fetching tags for {}", url);
                let names = self.transport.list_tag_names(url).await?;
                let tags = RemoteTagSet::from_tag_names(url, names)
                    .inspect_err(|e| warn!("Discarding tags of {}: {}", url, e))?;
                info!("Found {} tags for {}", tags.len(), url);
                Ok::<_, FetchError>(Arc::new(tags))
            })
            .await
    }

    /// Resolve several repositories concurrently
    ///
    /// Duplicate URLs are collapsed before fetching. Fetches start `stagger`
    /// apart to avoid hammering a single host.
    pub async fn resolve_all<I>(
        &self,
        urls: I,
        stagger: Duration,
    ) -> HashMap<String, Result<Arc<RemoteTagSet>, FetchError>>
    where
        I: IntoIterator<Item = String>,
    {
        let unique: BTreeSet<String> = urls.into_iter().collect();
        debug!("Resolving {} repositories", unique.len());

        let futures = unique.into_iter().enumerate().map(|(i, url)| {
            let delay = stagger * i as u32;
            async move {
                if self.cache.get(&url).is_none() {
                    sleep(delay).await;
                }
                let result = self.resolve(&url).await;
                (url, result)
            }
        });

        join_all(futures).await.into_iter().collect()
    }
}
