use crate::error::{Result, SemtagError};
use crate::git::{CommitInfo, Repository, TagRef};
use std::collections::HashMap;

/// In-memory commit graph for testing without a real repository
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    commits: HashMap<String, CommitInfo>,
    tags: Vec<TagRef>,
    head: Option<String>,
    branch: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository::default()
    }

    /// Add a commit; the last one added becomes HEAD
    pub fn add_commit(&mut self, hash: &str, parents: &[&str], message: &str) -> &mut Self {
        self.commits.insert(
            hash.to_string(),
            CommitInfo::new(hash, parents.iter().copied(), message),
        );
        self.head = Some(hash.to_string());
        self
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: &str, hash: &str) -> &mut Self {
        self.tags.push(TagRef::new(name, hash));
        self
    }

    /// Move HEAD to a commit
    pub fn set_head(&mut self, hash: &str) -> &mut Self {
        self.head = Some(hash.to_string());
        self
    }

    /// Attach HEAD to a branch name, or detach it with `None`
    pub fn set_branch(&mut self, branch: Option<&str>) -> &mut Self {
        self.branch = branch.map(str::to_string);
        self
    }
}

impl Repository for MockRepository {
    fn head_commit_hash(&self) -> Result<String> {
        self.head
            .clone()
            .ok_or_else(|| SemtagError::traversal("Repository has no commits"))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn find_commit(&self, hash: &str) -> Result<CommitInfo> {
        self.commits
            .get(hash)
            .cloned()
            .ok_or_else(|| SemtagError::traversal(format!("Commit not found: {}", hash)))
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }
}
