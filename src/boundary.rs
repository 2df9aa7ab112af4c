use std::fmt;

/// Non-fatal conditions met while resolving a version.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// HEAD is not attached to any branch
    DetachedHead,
    /// The branch name matches none of the configured branch patterns
    UnknownBranch { branch: String },
    /// No FINAL release is reachable from HEAD
    NoFinalRelease { initial: String },
    /// Nothing was committed since the last qualifying release
    NoNewCommits { current_commit_hash: String },
    /// The generated tag already exists and was accepted anyway
    ForcedCollision { tag: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DetachedHead => {
                write!(f, "HEAD is detached; no branch configuration applies")
            }
            BoundaryWarning::UnknownBranch { branch } => {
                write!(f, "Branch '{}' matches no configured branch pattern", branch)
            }
            BoundaryWarning::NoFinalRelease { initial } => {
                write!(
                    f,
                    "No final release found in history, starting at {}",
                    initial
                )
            }
            BoundaryWarning::NoNewCommits {
                current_commit_hash,
            } => {
                let short_hash = current_commit_hash
                    .get(..7)
                    .unwrap_or(current_commit_hash.as_str());
                write!(
                    f,
                    "No new commits since the last release (current: {})",
                    short_hash
                )
            }
            BoundaryWarning::ForcedCollision { tag } => {
                write!(f, "Tag '{}' already exists and was reused", tag)
            }
        }
    }
}
