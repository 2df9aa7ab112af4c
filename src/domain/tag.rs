use crate::domain::VersionInfo;
use std::collections::HashSet;

/// A tag name interpreted through one branch's version pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit_hash: String,
    pub version: VersionInfo,
}

impl Tag {
    /// Create a new tag interpretation
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>, version: VersionInfo) -> Self {
        Tag {
            name: name.into(),
            commit_hash: commit_hash.into(),
            version,
        }
    }
}

/// Set of tag names already present in the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    names: HashSet<String>,
}

impl TagSet {
    /// Create an empty set
    pub fn new() -> Self {
        TagSet::default()
    }

    /// Record a tag name; returns false if it was already known
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}
