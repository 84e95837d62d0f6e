use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Listing tags for {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Listing tags for {url} failed: {message}")]
    Remote { url: String, message: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Tag '{tag}' of {url} is not a semantic version: {source}")]
    MalformedTag {
        url: String,
        tag: String,
        #[source]
        source: semver::Error,
    },
}

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Specified version '{version}' is invalid: {source}")]
    InvalidExplicitVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Constraint '{constraint}' is invalid: {reason}")]
    InvalidConstraint { constraint: String, reason: String },
}
