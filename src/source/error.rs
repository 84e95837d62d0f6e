use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The text does not resolve to a git remote; callers skip such blocks
    #[error("'{source_text}' is not a git source: {reason}")]
    NotAGitSource {
        source_text: String,
        reason: String,
    },
}

impl SourceError {
    pub(crate) fn not_git(source_text: &str, reason: impl Into<String>) -> Self {
        SourceError::NotAGitSource {
            source_text: source_text.to_string(),
            reason: reason.into(),
        }
    }
}
