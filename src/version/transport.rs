//! Transport trait for listing the tags of a remote git repository

#[cfg(test)]
use mockall::automock;

use crate::version::error::TransportError;

/// Trait for listing tag names of a git remote
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TagTransport: Send + Sync {
    /// Lists all tag names of the repository at `url`
    ///
    /// # Arguments
    /// * `url` - Canonical repository URL (no getter prefixes, subfolder or query)
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Short tag names (e.g. "v1.2.0"), in no particular order
    /// * `Err(TransportError)` - If the remote could not be listed
    async fn list_tag_names(&self, url: &str) -> Result<Vec<String>, TransportError>;
}
