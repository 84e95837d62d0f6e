//! Remote tag set shared by every module that points at one repository

use crate::version::constraint::Constraint;
use crate::version::error::FetchError;
use crate::version::semver::Tag;

/// Semantic-version tags of one repository, sorted ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTagSet {
    url: String,
    tags: Vec<Tag>,
}

impl RemoteTagSet {
    pub fn new(url: &str, mut tags: Vec<Tag>) -> Self {
        tags.sort();
        Self {
            url: url.to_string(),
            tags,
        }
    }

    /// Build a tag set from raw tag names
    ///
    /// Every name must parse as a semantic version; the first one that does not
    /// fails the whole set.
    pub fn from_tag_names(url: &str, names: Vec<String>) -> Result<Self, FetchError> {
        let tags = names
            .into_iter()
            .map(|name| {
                Tag::parse(&name).map_err(|source| FetchError::MalformedTag {
                    url: url.to_string(),
                    tag: name,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(url, tags))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// All tags, lowest version first
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn latest(&self) -> Option<&Tag> {
        self.tags.last()
    }

    /// Highest tag satisfying `constraint`
    pub fn latest_matching(&self, constraint: &Constraint) -> Option<&Tag> {
        self.tags
            .iter()
            .rev()
            .find(|tag| constraint.matches(&tag.version))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
