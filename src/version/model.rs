//! Version state of a single module source

use std::sync::Arc;

use crate::source::SourceReference;
use crate::version::constraint::Constraint;
use crate::version::semver::Tag;
use crate::version::types::RemoteTagSet;

/// Label used for sources that track the default branch
pub const UNPINNED_LABEL: &str = "HEAD";

/// What the `ref` parameter of a source currently says
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionState {
    /// No `ref`: the source follows the default branch
    Unpinned,
    /// `ref` is a semantic version
    Pinned(Tag),
    /// `ref` is something else (branch name, commit SHA)
    Ref(String),
}

impl VersionState {
    fn from_pin(pin: Option<&str>) -> Self {
        match pin {
            None => VersionState::Unpinned,
            Some(pin) => match Tag::parse(pin) {
                Ok(tag) => VersionState::Pinned(tag),
                Err(_) => VersionState::Ref(pin.to_string()),
            },
        }
    }
}

/// A decomposed source together with its local and remote version state
#[derive(Debug, Clone)]
pub struct ModuleVersion {
    reference: SourceReference,
    state: VersionState,
    remote: Option<Arc<RemoteTagSet>>,
}

impl ModuleVersion {
    pub fn new(reference: SourceReference) -> Self {
        let state = VersionState::from_pin(reference.pin());
        Self {
            reference,
            state,
            remote: None,
        }
    }

    pub fn reference(&self) -> &SourceReference {
        &self.reference
    }

    pub fn canonical_url(&self) -> &str {
        self.reference.canonical_url()
    }

    pub fn current_version(&self) -> &VersionState {
        &self.state
    }

    /// `HEAD` when unpinned, otherwise the ref exactly as written
    pub fn local_version_label(&self) -> &str {
        match &self.state {
            VersionState::Unpinned => UNPINNED_LABEL,
            VersionState::Pinned(tag) => &tag.name,
            VersionState::Ref(name) => name,
        }
    }

    /// True only when pinned to a version numerically equal to `version`
    pub fn is_at_version(&self, version: &Tag) -> bool {
        matches!(&self.state, VersionState::Pinned(current) if current == version)
    }

    /// True only when pinned to a version strictly greater than `version`
    pub fn would_downgrade(&self, version: &Tag) -> bool {
        matches!(&self.state, VersionState::Pinned(current) if current > version)
    }

    /// Pin the source to `version`, replacing any previous state
    pub fn pin_to(&mut self, version: &Tag) {
        self.reference.set_pin(&version.name);
        self.state = VersionState::Pinned(version.clone());
    }

    pub fn remote(&self) -> Option<&RemoteTagSet> {
        self.remote.as_deref()
    }

    pub fn set_remote(&mut self, tags: Arc<RemoteTagSet>) {
        self.remote = Some(tags);
    }

    /// Highest remote tag satisfying `constraint`, if remote tags are known
    pub fn latest_matching(&self, constraint: &Constraint) -> Option<&Tag> {
        self.remote()?.latest_matching(constraint)
    }

    /// Render the (possibly re-pinned) source text
    pub fn encode(&self) -> String {
        crate::source::encode(&self.reference)
    }
}
