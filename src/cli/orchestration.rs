//! Version and changelog workflows
//!
//! These tie the analyzer, classifier and version pattern together into the
//! two things the CLI prints. They take their overrides as an explicit
//! [`ResolveOptions`] value so they can be driven without `clap`.

use tracing::info;

use crate::analyzer::Analyzer;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{BranchConfig, CommitClassifier, VersionInfo};
use crate::error::Result;
use crate::git::Repository;

/// Per-run overrides for a resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Resolve as if this branch were checked out
    pub branch: Option<String>,

    /// Use this build number instead of the computed one
    pub build: Option<u64>,
}

/// Result of [`resolve_version`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOutcome {
    /// The new tag; `None` when no branch configuration applies
    pub tag: Option<String>,

    /// The branch the version was resolved for
    pub branch: Option<String>,

    pub warnings: Vec<BoundaryWarning>,
}

/// Result of [`resolve_changelog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogOutcome {
    /// Rendered changelog; empty when nothing notable changed
    pub changelog: String,

    pub warnings: Vec<BoundaryWarning>,
}

/// Version used when no final release exists yet
fn initial_version() -> VersionInfo {
    VersionInfo::new(1, 0, 0, 0)
}

/// Branch name to resolve for, and its configuration when one matches
fn select_branch<'c, R: Repository + ?Sized>(
    repo: &R,
    analyzer: &Analyzer<'c>,
    options: &ResolveOptions,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<(Option<String>, Option<&'c BranchConfig>)> {
    let branch_name = match &options.branch {
        Some(name) => Some(name.clone()),
        None => repo.current_branch()?,
    };

    let Some(branch_name) = branch_name else {
        warnings.push(BoundaryWarning::DetachedHead);
        return Ok((None, None));
    };

    let branch = analyzer.branch_config(Some(branch_name.as_str()));
    if branch.is_none() {
        warnings.push(BoundaryWarning::UnknownBranch {
            branch: branch_name.clone(),
        });
    }
    Ok((Some(branch_name), branch))
}

/// Compute the next collision-free version tag for the current branch
///
/// 1. Index tags and pick the branch configuration
/// 2. Find the highest final release reachable from HEAD
/// 3. Classify the commits since the last release
/// 4. Apply the resulting increment and render the tag
pub fn resolve_version<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    options: &ResolveOptions,
) -> Result<VersionOutcome> {
    let analyzer = Analyzer::load(config, repo)?;
    let mut warnings = Vec::new();

    let (branch_name, branch) = match select_branch(repo, &analyzer, options, &mut warnings)? {
        (Some(name), Some(branch)) => (name, branch),
        (name, _) => {
            return Ok(VersionOutcome {
                tag: None,
                branch: name,
                warnings,
            })
        }
    };

    let highest = analyzer.highest_final_release(repo)?;
    let commits = analyzer.commits_since_last_release(
        repo,
        branch,
        config.resolution.version_sensitivity,
    )?;
    if commits.is_empty() {
        warnings.push(BoundaryWarning::NoNewCommits {
            current_commit_hash: analyzer.head().to_string(),
        });
    }

    let mut classifier = CommitClassifier::new();
    classifier.classify(&commits);

    let mut version = match highest {
        Some(mut version) => {
            if !classifier.is_empty() {
                classifier.version_increment().apply(&mut version)?;
            }
            version
        }
        None => {
            let version = initial_version();
            warnings.push(BoundaryWarning::NoFinalRelease {
                initial: format!("{}.{}.{}", version.major, version.minor, version.patch),
            });
            version
        }
    };
    version.release_channel = branch.release_channel;

    let tag = analyzer.generate_version_tag(&branch_name, branch, &mut version, options.build)?;
    if analyzer.used_tags().contains(&tag) {
        warnings.push(BoundaryWarning::ForcedCollision { tag: tag.clone() });
    }

    info!(tag = %tag, branch = %branch_name, "resolved version");
    Ok(VersionOutcome {
        tag: Some(tag),
        branch: Some(branch_name),
        warnings,
    })
}

/// Render the changelog of everything since the last relevant release
pub fn resolve_changelog<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    options: &ResolveOptions,
) -> Result<ChangelogOutcome> {
    let analyzer = Analyzer::load(config, repo)?;
    let mut warnings = Vec::new();

    let (_, Some(branch)) = select_branch(repo, &analyzer, options, &mut warnings)? else {
        return Ok(ChangelogOutcome {
            changelog: String::new(),
            warnings,
        });
    };

    let commits = analyzer.commits_since_last_release(
        repo,
        branch,
        config.resolution.changelog_sensitivity,
    )?;

    let mut classifier = CommitClassifier::new();
    classifier.classify(&commits);

    Ok(ChangelogOutcome {
        changelog: classifier.generate_changelog(),
        warnings,
    })
}
