use crate::domain::{ReleaseChannel, VersionPattern};
use crate::error::{Result, SemtagError};
use regex::Regex;

/// Regex matched against branch names
#[derive(Debug, Clone)]
pub struct BranchPattern {
    exp: Regex,
}

impl BranchPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let exp = Regex::new(pattern).map_err(|e| {
            SemtagError::config(format!("Can't parse branch pattern \"{}\": {}", pattern, e))
        })?;
        Ok(BranchPattern { exp })
    }

    pub fn matches(&self, branch_name: &str) -> bool {
        self.exp.is_match(branch_name)
    }

    pub fn as_str(&self) -> &str {
        self.exp.as_str()
    }
}

/// Versioning rules for branches whose name matches `branch_pattern`
#[derive(Debug, Clone)]
pub struct BranchConfig {
    pub branch_pattern: BranchPattern,
    pub version_pattern: VersionPattern,
    pub release_channel: ReleaseChannel,
}

impl BranchConfig {
    /// Compile both patterns; either failing is a configuration error
    pub fn new(
        branch_pattern: &str,
        version_pattern: &str,
        release_channel: ReleaseChannel,
    ) -> Result<Self> {
        Ok(BranchConfig {
            branch_pattern: BranchPattern::new(branch_pattern)?,
            version_pattern: VersionPattern::new(version_pattern, release_channel)?,
            release_channel,
        })
    }
}
