//! Repository access abstraction
//!
//! The version-resolution engine only ever reads a materialized view of the
//! commit graph and tag list. The [Repository] trait is that view:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory commit graph for tests
//!
//! ```rust
//! # use git_semtag::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_semtag::Result<()> {
//! let head = repo.head_commit_hash()?;
//! let commit = repo.find_commit(&head)?;
//! println!("{} has {} parent(s)", commit.hash, commit.parents.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use crate::domain::CommitInfo;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// A tag name and the commit it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub commit_hash: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        TagRef {
            name: name.into(),
            commit_hash: commit_hash.into(),
        }
    }
}

/// Read-only access to commits, tags and HEAD
///
/// Implementations map their own failures onto
/// [crate::error::SemtagError]; a commit that cannot be found is a
/// traversal error, never a silent skip.
pub trait Repository {
    /// Full hash of the commit HEAD points to
    fn head_commit_hash(&self) -> Result<String>;

    /// Short name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(Some(name))` - HEAD is attached to a branch
    /// * `Ok(None)` - HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    /// Load one commit with its parents and message
    fn find_commit(&self, hash: &str) -> Result<CommitInfo>;

    /// Every tag in the repository, peeled to the commit it marks
    fn list_tags(&self) -> Result<Vec<TagRef>>;
}
