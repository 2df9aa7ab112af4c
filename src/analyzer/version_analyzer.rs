use crate::analyzer::graph::{ancestors_of, Ancestry};
use crate::config::{ChannelSensitivity, Config, CutoffPolicy, VersionStrategy};
use crate::domain::{BranchConfig, ReleaseChannel, Tag, TagSet, VersionInfo};
use crate::error::Result;
use crate::git::{CommitInfo, Repository};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Length of the `{shortcommit}` placeholder value
const SHORT_COMMIT_LEN: usize = 10;

/// Tag index plus the graph queries that drive version resolution
///
/// Built once per pass by [`Analyzer::load`]; read-only afterwards.
pub struct Analyzer<'c> {
    config: &'c Config,
    head: String,
    commit_tags: HashMap<String, Vec<Tag>>,
    used_tags: TagSet,
}

impl<'c> Analyzer<'c> {
    /// Index every tag against every branch's version pattern
    ///
    /// A tag that fits several patterns is kept once per match.
    #[instrument(skip_all)]
    pub fn load<R: Repository + ?Sized>(config: &'c Config, repo: &R) -> Result<Self> {
        let head = repo.head_commit_hash()?;
        debug!(head = %head, "resolved head");

        let mut commit_tags: HashMap<String, Vec<Tag>> = HashMap::new();
        let mut used_tags = TagSet::new();

        for tag_ref in repo.list_tags()? {
            for branch in &config.branches {
                let Some(version) = branch.version_pattern.parse(&tag_ref.name) else {
                    continue;
                };
                debug!(tag = %tag_ref.name, commit = %tag_ref.commit_hash, version = %version, "found tag");

                commit_tags
                    .entry(tag_ref.commit_hash.clone())
                    .or_default()
                    .push(Tag::new(&tag_ref.name, &tag_ref.commit_hash, version));
                used_tags.insert(tag_ref.name.as_str());
            }
        }

        Ok(Analyzer {
            config,
            head,
            commit_tags,
            used_tags,
        })
    }

    /// Hash of the HEAD commit this pass resolves from
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Every tag name that matched at least one version pattern
    pub fn used_tags(&self) -> &TagSet {
        &self.used_tags
    }

    /// Tag interpretations attached to a commit
    pub fn tags_on(&self, commit_hash: &str) -> &[Tag] {
        self.commit_tags
            .get(commit_hash)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First branch rule whose pattern matches; `None` for unknown or detached branches
    pub fn branch_config(&self, branch_name: Option<&str>) -> Option<&'c BranchConfig> {
        let branch_name = match branch_name {
            Some(name) if !name.is_empty() && name != "HEAD" => name,
            _ => {
                debug!(branch = ?branch_name, "found no valid branch name");
                return None;
            }
        };

        let config = self
            .config
            .branches
            .iter()
            .find(|b| b.branch_pattern.matches(branch_name));

        match config {
            Some(b) => debug!(pattern = b.branch_pattern.as_str(), branch = branch_name, "found branch config"),
            None => debug!(branch = branch_name, "found no branch config"),
        }
        config
    }

    fn highest_final_on(&self, commit_hash: &str) -> Option<&VersionInfo> {
        self.tags_on(commit_hash)
            .iter()
            .map(|tag| &tag.version)
            .filter(|v| v.release_channel == ReleaseChannel::Final)
            .fold(None, |best: Option<&VersionInfo>, v| match best {
                Some(b) if !v.is_greater_than(b) => Some(b),
                _ => Some(v),
            })
    }

    /// Map every commit in a FINAL release's ancestry to one release built on it
    ///
    /// Releases are visited in ascending order; `Closest` keeps the first
    /// release to claim a commit, the other strategies the last.
    fn release_ancestry<R: Repository + ?Sized>(
        &self,
        repo: &R,
    ) -> Result<HashMap<String, &VersionInfo>> {
        let mut releases: Vec<&Tag> = self
            .commit_tags
            .values()
            .flatten()
            .filter(|tag| tag.version.release_channel == ReleaseChannel::Final)
            .collect();
        releases.sort_by(|a, b| {
            a.version
                .cmp_precedence(&b.version)
                .then_with(|| a.name.cmp(&b.name))
        });
        releases.dedup_by(|a, b| a.name == b.name);

        let keep_first = self.config.strategy == VersionStrategy::Closest;
        let mut claimed: HashMap<String, &VersionInfo> = HashMap::new();
        for tag in releases {
            debug!(tag = %tag.name, "mapping release ancestry");
            for hash in ancestors_of(repo, &tag.commit_hash)? {
                if keep_first {
                    claimed.entry(hash).or_insert(&tag.version);
                } else {
                    claimed.insert(hash, &tag.version);
                }
            }
        }
        Ok(claimed)
    }

    /// Greatest FINAL version reachable from HEAD, chosen per [`VersionStrategy`]
    #[instrument(skip_all, fields(strategy = ?self.config.strategy))]
    pub fn highest_final_release<R: Repository + ?Sized>(
        &self,
        repo: &R,
    ) -> Result<Option<VersionInfo>> {
        let mut highest: Option<&VersionInfo> = None;

        match self.config.strategy {
            VersionStrategy::OverallLatest => {
                for commit in Ancestry::new(repo, &self.head) {
                    let commit = commit?;
                    let Some(candidate) = self.highest_final_on(&commit.hash) else {
                        continue;
                    };
                    if highest.map_or(true, |h| candidate.is_greater_than(h)) {
                        highest = Some(candidate);
                    }
                }
            }
            VersionStrategy::Latest | VersionStrategy::Closest => {
                let claimed = self.release_ancestry(repo)?;
                for commit in Ancestry::new(repo, &self.head) {
                    let commit = commit?;
                    if let Some(version) = claimed.get(&commit.hash) {
                        highest = Some(*version);
                        break;
                    }
                }
            }
        }

        match highest {
            Some(version) => debug!(version = %version, "found highest release"),
            None => debug!("found no final release"),
        }
        Ok(highest.cloned())
    }

    fn is_cutoff(&self, commit_hash: &str, threshold: ReleaseChannel) -> bool {
        self.tags_on(commit_hash).iter().any(|tag| {
            let channel = tag.version.release_channel;
            channel.is_release() && channel.priority() >= threshold.priority()
        })
    }

    /// Commits from HEAD back to, but excluding, the nearest qualifying release
    ///
    /// Which releases qualify depends on `sensitivity` and the branch's own
    /// channel. Without any qualifying release the whole history is returned.
    #[instrument(skip_all, fields(sensitivity = ?sensitivity))]
    pub fn commits_since_last_release<R: Repository + ?Sized>(
        &self,
        repo: &R,
        branch: &BranchConfig,
        sensitivity: ChannelSensitivity,
    ) -> Result<Vec<CommitInfo>> {
        let threshold = sensitivity.threshold(branch.release_channel);
        let mut commits = Vec::new();

        match self.config.resolution.cutoff {
            CutoffPolicy::Nearest => {
                for commit in Ancestry::new(repo, &self.head) {
                    let commit = commit?;
                    if self.is_cutoff(&commit.hash, threshold) {
                        debug!(commit = %commit.hash, "stopping at release commit");
                        break;
                    }
                    commits.push(commit);
                }
            }
            CutoffPolicy::ExcludeReleased => {
                let mut excluded = HashSet::new();
                for hash in self.commit_tags.keys() {
                    if self.is_cutoff(hash, threshold) && !excluded.contains(hash) {
                        excluded.extend(ancestors_of(repo, hash)?);
                    }
                }

                for commit in Ancestry::excluding(repo, &self.head, excluded) {
                    commits.push(commit?);
                }
            }
        }

        debug!(count = commits.len(), "collected commits since last release");
        Ok(commits)
    }

    /// Fill in HEAD details and render a tag name no existing tag uses
    pub fn generate_version_tag(
        &self,
        branch_name: &str,
        branch: &BranchConfig,
        version: &mut VersionInfo,
        build: Option<u64>,
    ) -> Result<String> {
        version.branch = branch_name.to_string();
        version.commit = self.head.clone();
        version.short_commit = self
            .head
            .get(..SHORT_COMMIT_LEN)
            .unwrap_or(&self.head)
            .to_string();

        if let Some(build) = build {
            version.build = build;
        }

        branch.version_pattern.generate_unique(
            version,
            &self.used_tags,
            self.config.resolution.force_collision,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use crate::git::MockRepository;

    fn hashes(commits: &[CommitInfo]) -> Vec<&str> {
        commits.iter().map(|c| c.hash.as_str()).collect()
    }

    fn linear_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_tag("v1.0.0", "a")
            .add_commit("b", &["a"], "fix: one")
            .add_tag("v1.0.1-beta.0", "b")
            .add_commit("c", &["b"], "feat: two")
            .add_commit("d", &["c"], "fix: three")
            .set_branch(Some("main"));
        repo
    }

    fn config_with(edit: impl FnOnce(&mut ConfigFile)) -> Config {
        let mut file = ConfigFile::default();
        edit(&mut file);
        file.compile().unwrap()
    }

    #[test]
    fn test_load_indexes_matching_tags() {
        let config = Config::builtin().unwrap();
        let mut repo = linear_repo();
        repo.add_tag("not-a-version", "c");
        let analyzer = Analyzer::load(&config, &repo).unwrap();

        // master, main and release.* share one pattern
        assert_eq!(analyzer.tags_on("a").len(), 3);
        // beta.* plus both topic patterns, which read "beta" as a branch name
        let channels: Vec<_> = analyzer
            .tags_on("b")
            .iter()
            .map(|t| t.version.release_channel)
            .collect();
        assert_eq!(
            channels,
            vec![ReleaseChannel::Beta, ReleaseChannel::None, ReleaseChannel::None]
        );
        assert!(analyzer.tags_on("c").is_empty());
        assert!(analyzer.used_tags().contains("v1.0.0"));
        assert!(!analyzer.used_tags().contains("not-a-version"));
        assert_eq!(analyzer.head(), "d");
    }

    #[test]
    fn test_branch_config_resolution() {
        let config = Config::builtin().unwrap();
        let repo = linear_repo();
        let analyzer = Analyzer::load(&config, &repo).unwrap();

        let beta = analyzer.branch_config(Some("beta/2.0")).unwrap();
        assert_eq!(beta.release_channel, ReleaseChannel::Beta);
        assert_eq!(
            analyzer.branch_config(Some("release/1.x")).unwrap().release_channel,
            ReleaseChannel::Final
        );
        assert!(analyzer.branch_config(Some("docs/readme")).is_none());
        assert!(analyzer.branch_config(Some("")).is_none());
        assert!(analyzer.branch_config(Some("HEAD")).is_none());
        assert!(analyzer.branch_config(None).is_none());
    }

    #[test]
    fn test_highest_final_release_overall() {
        let config = Config::builtin().unwrap();
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_tag("v2.0.0", "a")
            .add_commit("b", &["a"], "fix")
            .add_tag("v1.5.0", "b")
            .add_tag("v9.0.0-beta.1", "b")
            .add_commit("c", &["b"], "feat");
        let analyzer = Analyzer::load(&config, &repo).unwrap();

        let highest = analyzer.highest_final_release(&repo).unwrap().unwrap();
        assert_eq!((highest.major, highest.minor, highest.patch), (2, 0, 0));
        assert_eq!(highest.release_channel, ReleaseChannel::Final);
    }

    #[test]
    fn test_highest_final_release_closest() {
        let config = config_with(|f| f.strategy = VersionStrategy::Closest);
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_tag("v2.0.0", "a")
            .add_commit("b", &["a"], "fix")
            .add_tag("v1.5.0", "b")
            .add_tag("v1.4.0", "b")
            .add_commit("c", &["b"], "feat");
        let analyzer = Analyzer::load(&config, &repo).unwrap();

        let highest = analyzer.highest_final_release(&repo).unwrap().unwrap();
        assert_eq!((highest.major, highest.minor), (1, 4));
    }

    /// a(v1.0.0) <- b <- c     feat/x, HEAD
    ///  \
    ///   <- r(v1.3.0)          release line, never merged
    fn release_on_sibling_line() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_tag("v1.0.0", "a")
            .add_commit("b", &["a"], "feat: x")
            .add_commit("c", &["b"], "fix: x")
            .add_commit("r", &["a"], "fix: on release line")
            .add_tag("v1.3.0", "r")
            .set_head("c")
            .set_branch(Some("feat/x"));
        repo
    }

    #[test]
    fn test_highest_final_release_latest_sees_sibling_release() {
        let config = config_with(|f| f.strategy = VersionStrategy::Latest);
        let repo = release_on_sibling_line();
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        assert_eq!(analyzer.head(), "c");

        let highest = analyzer.highest_final_release(&repo).unwrap().unwrap();
        assert_eq!((highest.major, highest.minor), (1, 3));
    }

    #[test]
    fn test_highest_final_release_strategies_on_fork() {
        let repo = release_on_sibling_line();
        let cases = [
            (VersionStrategy::OverallLatest, 0),
            (VersionStrategy::Closest, 0),
            (VersionStrategy::Latest, 3),
        ];

        for (strategy, minor) in cases {
            let config = config_with(|f| f.strategy = strategy);
            let analyzer = Analyzer::load(&config, &repo).unwrap();
            let highest = analyzer.highest_final_release(&repo).unwrap().unwrap();
            assert_eq!(highest.minor, minor, "strategy {:?}", strategy);
        }
    }

    #[test]
    fn test_highest_final_release_latest_stops_at_nearest() {
        let config = config_with(|f| f.strategy = VersionStrategy::Latest);
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_tag("v2.0.0", "a")
            .add_commit("b", &["a"], "fix")
            .add_tag("v1.5.0", "b")
            .add_tag("v1.4.0", "b")
            .add_commit("c", &["b"], "feat");
        let analyzer = Analyzer::load(&config, &repo).unwrap();

        // b is the nearest released commit and v1.5.0 the greatest release on it
        let highest = analyzer.highest_final_release(&repo).unwrap().unwrap();
        assert_eq!((highest.major, highest.minor), (1, 5));
    }

    #[test]
    fn test_highest_final_release_ignores_unreachable_tags() {
        let config = Config::builtin().unwrap();
        let mut repo = MockRepository::new();
        repo.add_commit("side", &[], "other root")
            .add_tag("v5.0.0", "side")
            .add_commit("a", &[], "initial")
            .add_tag("v1.0.0", "a")
            .add_commit("b", &["a"], "fix");
        let analyzer = Analyzer::load(&config, &repo).unwrap();

        let highest = analyzer.highest_final_release(&repo).unwrap().unwrap();
        assert_eq!(highest.major, 1);
    }

    #[test]
    fn test_highest_final_release_none() {
        let config = Config::builtin().unwrap();
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_tag("v1.0.0-alpha.1", "a");
        let analyzer = Analyzer::load(&config, &repo).unwrap();

        assert_eq!(analyzer.highest_final_release(&repo).unwrap(), None);
    }

    #[test]
    fn test_commits_since_any_release() {
        let config = Config::builtin().unwrap();
        let repo = linear_repo();
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();

        let commits = analyzer
            .commits_since_last_release(&repo, main, ChannelSensitivity::AnyRelease)
            .unwrap();
        assert_eq!(hashes(&commits), vec!["d", "c"]);
    }

    #[test]
    fn test_commits_since_branch_channel() {
        let config = Config::builtin().unwrap();
        let repo = linear_repo();
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();

        // The beta tag on b is below FINAL, so the walk runs on to v1.0.0
        let commits = analyzer
            .commits_since_last_release(&repo, main, ChannelSensitivity::BranchChannel)
            .unwrap();
        assert_eq!(hashes(&commits), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_commits_since_ignores_non_release_tags() {
        let config = Config::builtin().unwrap();
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_commit("b", &["a"], "feat: x")
            .add_tag("v1.0.0-feat_x.0", "b")
            .add_commit("c", &["b"], "fix: y");
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        let feat = analyzer.branch_config(Some("feat/x")).unwrap();

        let commits = analyzer
            .commits_since_last_release(&repo, feat, ChannelSensitivity::AnyRelease)
            .unwrap();
        assert_eq!(hashes(&commits), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_commits_since_head_is_release() {
        let config = Config::builtin().unwrap();
        let mut repo = linear_repo();
        repo.add_tag("v1.1.0", "d");
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();

        let commits = analyzer
            .commits_since_last_release(&repo, main, ChannelSensitivity::AnyRelease)
            .unwrap();
        assert!(commits.is_empty());
    }

    /// a(v1.0.0) <- b <- m <- h
    ///  \              /
    ///   <- r(v1.1.0) <- s
    fn merged_release_lines() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_tag("v1.0.0", "a")
            .add_commit("r", &["a"], "fix: on release line")
            .add_tag("v1.1.0", "r")
            .add_commit("s", &["r"], "feat: after release")
            .add_commit("b", &["a"], "feat: mainline")
            .add_commit("m", &["b", "s"], "merge release line")
            .add_commit("h", &["m"], "fix: head");
        repo
    }

    #[test]
    fn test_nearest_cutoff_on_merge_history() {
        let config = Config::builtin().unwrap();
        let repo = merged_release_lines();
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();

        // Breadth-first: h, m, b, s, then a (release) stops the whole walk
        let commits = analyzer
            .commits_since_last_release(&repo, main, ChannelSensitivity::AnyRelease)
            .unwrap();
        assert_eq!(hashes(&commits), vec!["h", "m", "b", "s"]);
    }

    #[test]
    fn test_exclude_released_cutoff_on_merge_history() {
        let config = config_with(|f| f.resolution.cutoff = CutoffPolicy::ExcludeReleased);
        let repo = merged_release_lines();
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();

        let commits = analyzer
            .commits_since_last_release(&repo, main, ChannelSensitivity::AnyRelease)
            .unwrap();
        assert_eq!(hashes(&commits), vec!["h", "m", "b", "s"]);
    }

    #[test]
    fn test_policies_differ_when_release_is_reached_late() {
        // h <- x <- r(v1.1.0) <- a ; h <- y <- z <- a  (y/z not behind any release)
        let mut repo = MockRepository::new();
        repo.add_commit("a", &[], "initial")
            .add_commit("r", &["a"], "fix: released")
            .add_tag("v1.1.0", "r")
            .add_commit("x", &["r"], "fix: x")
            .add_commit("z", &["a"], "feat: z")
            .add_commit("y", &["z"], "feat: y")
            .add_commit("h", &["x", "y"], "merge");

        let nearest = Config::builtin().unwrap();
        let analyzer = Analyzer::load(&nearest, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();
        let commits = analyzer
            .commits_since_last_release(&repo, main, ChannelSensitivity::AnyRelease)
            .unwrap();
        assert_eq!(hashes(&commits), vec!["h", "x", "y"]);

        let exclude = config_with(|f| f.resolution.cutoff = CutoffPolicy::ExcludeReleased);
        let analyzer = Analyzer::load(&exclude, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();
        let commits = analyzer
            .commits_since_last_release(&repo, main, ChannelSensitivity::AnyRelease)
            .unwrap();
        assert_eq!(hashes(&commits), vec!["h", "x", "y", "z"]);
    }

    #[test]
    fn test_generate_version_tag_fills_head_details() {
        let config = config_with(|f| {
            f.branches[6].version_pattern =
                "v{major}.{minor}.{patch}-{branch}.{build}+{shortcommit}".to_string()
        });
        let mut repo = MockRepository::new();
        repo.add_commit("0123456789abcdef", &[], "initial");
        let analyzer = Analyzer::load(&config, &repo).unwrap();
        let feat = analyzer.branch_config(Some("feat/login")).unwrap();

        let mut version = VersionInfo::new(1, 2, 0, 0);
        let tag = analyzer
            .generate_version_tag("feat/login", feat, &mut version, Some(7))
            .unwrap();
        assert_eq!(tag, "v1.2.0-feat_login.7+0123456789");
        assert_eq!(version.commit, "0123456789abcdef");
        assert_eq!(version.branch, "feat/login");
    }

    #[test]
    fn test_generate_version_tag_collision_policy() {
        let repo = linear_repo();

        let forced = Config::builtin().unwrap();
        let analyzer = Analyzer::load(&forced, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();
        let tag = analyzer
            .generate_version_tag("main", main, &mut VersionInfo::new(1, 0, 0, 0), None)
            .unwrap();
        assert_eq!(tag, "v1.0.0");

        let strict = config_with(|f| f.resolution.force_collision = false);
        let analyzer = Analyzer::load(&strict, &repo).unwrap();
        let main = analyzer.branch_config(Some("main")).unwrap();
        let err = analyzer
            .generate_version_tag("main", main, &mut VersionInfo::new(1, 0, 0, 0), None)
            .unwrap_err();
        assert!(err.is_disambiguation());
    }
}
