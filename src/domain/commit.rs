use crate::domain::VersionIncrement;

/// A commit as supplied by the repository layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// Parent hashes, first parent first
    pub parents: Vec<String>,
    /// The commit message
    pub message: String,
}

impl CommitInfo {
    pub fn new<P, S>(hash: impl Into<String>, parents: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommitInfo {
            hash: hash.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

/// Impact of one message fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Major,
    Minor,
    Patch,
    Unknown,
}

impl ChangeKind {
    const PREFIXES: [(&'static str, ChangeKind); 3] = [
        ("break:", ChangeKind::Major),
        ("feat:", ChangeKind::Minor),
        ("fix:", ChangeKind::Patch),
    ];
}

/// One `;`-separated part of a commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub kind: ChangeKind,
    pub message: String,
    pub hash: String,
}

impl ParsedCommit {
    /// Classify a single fragment by its case-insensitive prefix
    ///
    /// Supports `break:`, `feat:` and `fix:`; anything else is kept whole
    /// as [`ChangeKind::Unknown`].
    pub fn parse(fragment: &str, hash: &str) -> Self {
        let fragment = fragment.trim();

        for (prefix, kind) in ChangeKind::PREFIXES {
            let matches = fragment
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
            if matches {
                return ParsedCommit {
                    kind,
                    message: fragment[prefix.len()..].trim().to_string(),
                    hash: hash.to_string(),
                };
            }
        }

        ParsedCommit {
            kind: ChangeKind::Unknown,
            message: fragment.to_string(),
            hash: hash.to_string(),
        }
    }
}

/// Buckets commit message fragments by their version impact
#[derive(Debug, Clone, Default)]
pub struct CommitClassifier {
    pub major: Vec<ParsedCommit>,
    pub minor: Vec<ParsedCommit>,
    pub patch: Vec<ParsedCommit>,
    pub unknown: Vec<ParsedCommit>,
}

impl CommitClassifier {
    pub fn new() -> Self {
        CommitClassifier::default()
    }

    /// Split every message on `;` and file each fragment in its bucket
    pub fn classify<'a>(&mut self, commits: impl IntoIterator<Item = &'a CommitInfo>) {
        for commit in commits {
            for fragment in commit.message.split(';') {
                let parsed = ParsedCommit::parse(fragment, &commit.hash);
                match parsed.kind {
                    ChangeKind::Major => self.major.push(parsed),
                    ChangeKind::Minor => self.minor.push(parsed),
                    ChangeKind::Patch => self.patch.push(parsed),
                    ChangeKind::Unknown => self.unknown.push(parsed),
                }
            }
        }
    }

    /// True when no fragment of any kind was seen
    pub fn is_empty(&self) -> bool {
        self.major.is_empty()
            && self.minor.is_empty()
            && self.patch.is_empty()
            && self.unknown.is_empty()
    }

    /// Render breaking changes, features and fixes; unknown fragments are dropped
    pub fn generate_changelog(&self) -> String {
        let sections = [
            ("BREAKING CHANGES", &self.major),
            ("Features", &self.minor),
            ("Fixes", &self.patch),
        ];

        let mut changelog = String::new();
        for (heading, entries) in sections {
            if entries.is_empty() {
                continue;
            }
            changelog.push_str(&format!("# {}\n", heading));
            for entry in entries {
                changelog.push_str(&format!("* {} ({})\n", entry.message, entry.hash));
            }
            changelog.push('\n');
        }
        changelog
    }

    /// Smallest bump that covers every classified fragment
    pub fn version_increment(&self) -> VersionIncrement {
        let mut increment = VersionIncrement::new();
        if !self.major.is_empty() {
            increment.increment_major();
        } else if !self.minor.is_empty() {
            increment.increment_minor();
        } else if !self.patch.is_empty() {
            increment.increment_patch();
        } else if !self.unknown.is_empty() {
            increment.increment_build();
        }
        increment
    }
}
