use crate::error::{Result, SemtagError};
use crate::git::{CommitInfo, Repository, TagRef};
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref())?;
        info!(path = %repo.path().display(), "opened git repository");

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl Repository for Git2Repository {
    fn head_commit_hash(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| SemtagError::traversal(format!("Can't load head: {}", e)))?;
        let commit = head
            .peel_to_commit()
            .map_err(|e| SemtagError::traversal(format!("Can't load head commit: {}", e)))?;

        Ok(commit.id().to_string())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }

        let head = self.repo.head()?;
        let name = head.shorthand().filter(|name| !name.is_empty() && *name != "HEAD");
        Ok(name.map(str::to_string))
    }

    fn find_commit(&self, hash: &str) -> Result<CommitInfo> {
        let oid = Oid::from_str(hash)
            .map_err(|e| SemtagError::traversal(format!("Invalid commit hash '{}': {}", hash, e)))?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| SemtagError::traversal(format!("Can't load commit {}: {}", hash, e)))?;

        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();

        Ok(CommitInfo {
            hash: commit.id().to_string(),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
            message,
        })
    }

    #[instrument(skip(self))]
    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            let target = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    debug!(tag = name, error = %e, "skipping tag that does not point at a commit");
                    continue;
                }
            };

            tags.push(TagRef::new(name, target.id().to_string()));
        }

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }
}
