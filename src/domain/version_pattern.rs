//! Bidirectional codec between a tag template and [`VersionInfo`]
//!
//! A template such as `v{major}.{minor}.{patch}-{branch}.{build}` is compiled
//! once into an anchored regex for parsing existing tags, and rendered by
//! plain substitution when generating new ones.

use crate::domain::{ReleaseChannel, TagSet, VersionInfo};
use crate::error::{Result, SemtagError};
use regex::Regex;

/// A placeholder that may appear in a version template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Major,
    Minor,
    Patch,
    Build,
    Branch,
    Commit,
    ShortCommit,
}

impl Placeholder {
    const ALL: [Placeholder; 7] = [
        Placeholder::Major,
        Placeholder::Minor,
        Placeholder::Patch,
        Placeholder::Build,
        Placeholder::Branch,
        Placeholder::Commit,
        Placeholder::ShortCommit,
    ];

    fn token(self) -> &'static str {
        match self {
            Placeholder::Major => "{major}",
            Placeholder::Minor => "{minor}",
            Placeholder::Patch => "{patch}",
            Placeholder::Build => "{build}",
            Placeholder::Branch => "{branch}",
            Placeholder::Commit => "{commit}",
            Placeholder::ShortCommit => "{shortcommit}",
        }
    }

    fn group(self) -> &'static str {
        match self {
            Placeholder::Major => "major",
            Placeholder::Minor => "minor",
            Placeholder::Patch => "patch",
            Placeholder::Build => "build",
            Placeholder::Branch => "branch",
            Placeholder::Commit => "commit",
            Placeholder::ShortCommit => "shortcommit",
        }
    }

    fn capture(self) -> &'static str {
        match self {
            Placeholder::Major | Placeholder::Minor | Placeholder::Patch | Placeholder::Build => {
                r"\d+"
            }
            Placeholder::Branch => r"[a-zA-Z0-9_\-\\/()\[\]]+",
            Placeholder::Commit | Placeholder::ShortCommit => r"[a-zA-Z0-9]+",
        }
    }

    /// Store a captured value; numeric fields reject values that don't fit
    fn assign(self, info: &mut VersionInfo, value: &str) -> Option<()> {
        match self {
            Placeholder::Major => info.major = value.parse().ok()?,
            Placeholder::Minor => info.minor = value.parse().ok()?,
            Placeholder::Patch => info.patch = value.parse().ok()?,
            Placeholder::Build => info.build = value.parse().ok()?,
            Placeholder::Branch => info.branch = value.to_string(),
            Placeholder::Commit => info.commit = value.to_string(),
            Placeholder::ShortCommit => info.short_commit = value.to_string(),
        }
        Some(())
    }

    fn render(self, info: &VersionInfo) -> String {
        match self {
            Placeholder::Major => info.major.to_string(),
            Placeholder::Minor => info.minor.to_string(),
            Placeholder::Patch => info.patch.to_string(),
            Placeholder::Build => info.build.to_string(),
            Placeholder::Branch => sanitize_branch(&info.branch),
            Placeholder::Commit => info.commit.clone(),
            Placeholder::ShortCommit => info.short_commit.clone(),
        }
    }

    fn at_start_of(text: &str) -> Option<Placeholder> {
        Placeholder::ALL
            .into_iter()
            .find(|p| text.starts_with(p.token()))
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`
pub fn sanitize_branch(branch: &str) -> String {
    branch
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Compiled version template bound to a release channel
#[derive(Debug, Clone)]
pub struct VersionPattern {
    pattern: String,
    release_channel: ReleaseChannel,
    placeholders: Vec<Placeholder>,
    exp: Regex,
}

impl VersionPattern {
    /// Compile a template; literal text is escaped, placeholders become named groups
    pub fn new(pattern: impl Into<String>, release_channel: ReleaseChannel) -> Result<Self> {
        let pattern = pattern.into();
        let mut expression = String::from("^");
        let mut placeholders = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern.as_str();

        while let Some(c) = rest.chars().next() {
            if let Some(placeholder) = Placeholder::at_start_of(rest) {
                expression.push_str(&regex::escape(&literal));
                literal.clear();
                expression.push_str(&format!(
                    "(?P<{}>{})",
                    placeholder.group(),
                    placeholder.capture()
                ));
                placeholders.push(placeholder);
                rest = &rest[placeholder.token().len()..];
            } else {
                literal.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
        expression.push_str(&regex::escape(&literal));
        expression.push('$');

        let exp = Regex::new(&expression).map_err(|e| {
            SemtagError::config(format!("Can't parse version pattern \"{}\": {}", pattern, e))
        })?;

        Ok(VersionPattern {
            pattern,
            release_channel,
            placeholders,
            exp,
        })
    }

    /// The raw template string
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The channel every parsed version is assigned
    pub fn release_channel(&self) -> ReleaseChannel {
        self.release_channel
    }

    /// Whether collisions can be resolved by bumping the build number
    pub fn uses_build(&self) -> bool {
        self.placeholders.contains(&Placeholder::Build)
    }

    /// Read a tag name; `None` if it doesn't fit the template
    pub fn parse(&self, tag_name: &str) -> Option<VersionInfo> {
        let captures = self.exp.captures(tag_name)?;
        let mut info = VersionInfo {
            release_channel: self.release_channel,
            ..VersionInfo::default()
        };

        for placeholder in &self.placeholders {
            let value = captures.name(placeholder.group())?;
            placeholder.assign(&mut info, value.as_str())?;
        }

        Some(info)
    }

    /// Render a tag name from a version
    pub fn generate(&self, info: &VersionInfo) -> String {
        Placeholder::ALL
            .into_iter()
            .fold(self.pattern.clone(), |rendered, placeholder| {
                if rendered.contains(placeholder.token()) {
                    rendered.replace(placeholder.token(), &placeholder.render(info))
                } else {
                    rendered
                }
            })
    }

    /// Render a tag name that is not in `used`
    ///
    /// Collisions are resolved by incrementing `info.build` when the template
    /// has a `{build}` placeholder. Without one, `force` returns the colliding
    /// name as-is and otherwise the call fails. Running out of build numbers
    /// is an overflow error.
    pub fn generate_unique(
        &self,
        info: &mut VersionInfo,
        used: &TagSet,
        force: bool,
    ) -> Result<String> {
        let mut tag = self.generate(info);
        if !used.contains(&tag) {
            return Ok(tag);
        }

        if !self.uses_build() {
            if force {
                return Ok(tag);
            }
            return Err(SemtagError::Disambiguation { tag });
        }

        while used.contains(&tag) {
            let build = info.build;
            info.build = build
                .checked_add(1)
                .ok_or_else(|| SemtagError::overflow("build", build))?;
            tag = self.generate(info);
        }

        Ok(tag)
    }
}
