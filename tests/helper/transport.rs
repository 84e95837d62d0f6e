//! Transport test utilities

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use modpin::version::error::TransportError;
use modpin::version::transport::TagTransport;

/// In-memory transport that records how often each URL was listed
#[derive(Default)]
pub struct MockTransport {
    tags: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    delay: Duration,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, url: &str, tags: &[&str]) -> Self {
        self.tags
            .insert(url.to_string(), tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_failure(mut self, url: &str, message: &str) -> Self {
        self.failures.insert(url.to_string(), message.to_string());
        self
    }

    /// Delay every listing, so concurrent lookups overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl TagTransport for MockTransport {
    async fn list_tag_names(&self, url: &str) -> Result<Vec<String>, TransportError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(message) = self.failures.get(url) {
            return Err(TransportError::Remote {
                url: url.to_string(),
                message: message.clone(),
            });
        }

        self.tags
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Remote {
                url: url.to_string(),
                message: "repository not found".to_string(),
            })
    }
}
