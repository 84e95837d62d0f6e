//! Decomposed module source reference

use std::fmt;

/// How the repository location was written in the source string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    /// URL with an explicit scheme (`https://`, `ssh://`, `git://`, ...)
    Url,
    /// scp-like ssh address (`git@github.com:org/repo.git`)
    Scp,
    /// Known host shorthand (`github.com/org/repo`)
    Shorthand,
}

/// Repository location, as written and in canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub kind: RemoteKind,
    /// Text exactly as it appeared in the source string
    pub text: String,
    /// URL used for listing tags and as the cache key
    pub canonical: String,
}

/// A git module source split into its parts
///
/// `getters` are kept in written order (outermost first), so
/// `git::ssh::host/repo` yields `["git", "ssh"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    pub getters: Vec<String>,
    pub remote: Remote,
    /// Path after the `//` marker, carried through verbatim
    pub subfolder: Option<String>,
    /// Whether the text had a `?`, even with nothing after it
    pub has_query: bool,
    /// Raw query segments other than the first `ref`, in original order,
    /// empty segments included
    pub query: Vec<String>,
    /// Index in `query` at which the `ref` pair originally stood
    pub ref_position: Option<usize>,
    /// Raw value of the `ref` query parameter
    pub pin: Option<String>,
    /// `ref` was written without `=`
    pub bare_ref: bool,
}

impl SourceReference {
    /// Canonical repository URL: no getters, subfolder or query
    pub fn canonical_url(&self) -> &str {
        &self.remote.canonical
    }

    pub fn pin(&self) -> Option<&str> {
        self.pin.as_deref()
    }

    /// Replace the pinned ref, keeping its position in the query string
    pub fn set_pin(&mut self, pin: &str) {
        self.pin = Some(pin.to_string());
        self.bare_ref = false;
    }

    /// Query pairs as they will be written, with `ref` re-inserted when pinned
    pub fn query_pairs(&self) -> Vec<String> {
        let mut pairs = self.query.clone();
        if let Some(pin) = &self.pin {
            let position = self
                .ref_position
                .map_or(pairs.len(), |p| p.min(pairs.len()));
            let pair = if self.bare_ref {
                "ref".to_string()
            } else {
                format!("ref={pin}")
            };
            pairs.insert(position, pair);
        }
        pairs
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::source::encode::encode(self))
    }
}
