use crate::domain::ReleaseChannel;
use std::cmp::Ordering;
use std::fmt;

/// A version as read from, or rendered into, a tag name
///
/// Numeric fields are unsigned so they can never go negative. Text fields
/// are only meaningful for templates that reference them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
    pub branch: String,
    pub commit: String,
    pub short_commit: String,
    pub release_channel: ReleaseChannel,
}

impl VersionInfo {
    /// Create a version with the given numeric parts and no text fields
    pub fn new(major: u64, minor: u64, patch: u64, build: u64) -> Self {
        VersionInfo {
            major,
            minor,
            patch,
            build,
            ..VersionInfo::default()
        }
    }

    /// Set the release channel
    pub fn with_channel(mut self, channel: ReleaseChannel) -> Self {
        self.release_channel = channel;
        self
    }

    fn precedence_key(&self) -> (u64, u64, u64, u8, u64) {
        (
            self.major,
            self.minor,
            self.patch,
            self.release_channel.priority(),
            self.build,
        )
    }

    /// Compare by (major, minor, patch, channel priority, build)
    ///
    /// Text fields do not take part, so two versions that only differ in
    /// branch or commit compare as `Equal`.
    pub fn cmp_precedence(&self, other: &VersionInfo) -> Ordering {
        self.precedence_key().cmp(&other.precedence_key())
    }

    /// Strict "newer than" check used to pick the highest release
    pub fn is_greater_than(&self, other: &VersionInfo) -> bool {
        self.cmp_precedence(other) == Ordering::Greater
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}-{} [{}]",
            self.major, self.minor, self.patch, self.build, self.branch, self.release_channel
        )
    }
}
