//! Breadth-first ancestry walks over the commit graph

use crate::error::Result;
use crate::git::{CommitInfo, Repository};
use std::collections::{HashSet, VecDeque};

/// Iterator over every commit reachable from a start commit, start included
///
/// Commits reachable through several merge paths are yielded once. Commits
/// in the excluded set are neither yielded nor walked through.
pub struct Ancestry<'r, R: Repository + ?Sized> {
    repo: &'r R,
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl<'r, R: Repository + ?Sized> Ancestry<'r, R> {
    pub fn new(repo: &'r R, start: &str) -> Self {
        Ancestry::excluding(repo, start, HashSet::new())
    }

    pub fn excluding(repo: &'r R, start: &str, excluded: HashSet<String>) -> Self {
        let mut walk = Ancestry {
            repo,
            queue: VecDeque::new(),
            seen: excluded,
        };
        walk.enqueue(start);
        walk
    }

    fn enqueue(&mut self, hash: &str) {
        if self.seen.insert(hash.to_string()) {
            self.queue.push_back(hash.to_string());
        }
    }
}

impl<R: Repository + ?Sized> Iterator for Ancestry<'_, R> {
    type Item = Result<CommitInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.queue.pop_front()?;
        let commit = match self.repo.find_commit(&hash) {
            Ok(commit) => commit,
            Err(e) => {
                // A broken graph can't be walked further.
                self.queue.clear();
                return Some(Err(e));
            }
        };

        for parent in &commit.parents {
            self.enqueue(parent);
        }

        Some(Ok(commit))
    }
}

/// Hashes of every commit reachable from `start`, `start` included
pub fn ancestors_of<R: Repository + ?Sized>(repo: &R, start: &str) -> Result<HashSet<String>> {
    Ancestry::new(repo, start)
        .map(|commit| commit.map(|c| c.hash))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    /// a <- b <- c <- e
    ///       \       /
    ///        <- d <-
    fn diamond() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "root")
            .add_commit("b", &["a"], "b")
            .add_commit("c", &["b"], "c")
            .add_commit("d", &["b"], "d")
            .add_commit("e", &["c", "d"], "merge");
        repo
    }

    fn hashes(walk: impl Iterator<Item = Result<CommitInfo>>) -> Vec<String> {
        walk.map(|c| c.unwrap().hash).collect()
    }

    #[test]
    fn test_visits_each_commit_once_breadth_first() {
        let repo = diamond();
        assert_eq!(hashes(Ancestry::new(&repo, "e")), vec!["e", "c", "d", "b", "a"]);
    }

    #[test]
    fn test_excluded_commits_are_not_walked() {
        let repo = diamond();
        let excluded: HashSet<String> = ["b".to_string()].into_iter().collect();
        assert_eq!(
            hashes(Ancestry::excluding(&repo, "e", excluded)),
            vec!["e", "c", "d"]
        );
    }

    #[test]
    fn test_ancestors_of() {
        let repo = diamond();
        let ancestors = ancestors_of(&repo, "c").unwrap();
        assert_eq!(ancestors.len(), 3);
        assert!(ancestors.contains("a"));
        assert!(!ancestors.contains("d"));
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let mut repo = MockRepository::new();
        repo.add_commit("b", &["gone"], "orphaned");

        let results: Vec<_> = Ancestry::new(&repo, "b").collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(ancestors_of(&repo, "b").is_err());
    }
}
