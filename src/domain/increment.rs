use crate::domain::VersionInfo;
use crate::error::{Result, SemtagError};

/// Size of a version bump, ordered from smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IncrementLevel {
    #[default]
    Build,
    Patch,
    Minor,
    Major,
}

/// Minimal required bump; can only ever escalate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionIncrement {
    level: IncrementLevel,
}

impl VersionIncrement {
    /// Start at the smallest level
    pub fn new() -> Self {
        VersionIncrement::default()
    }

    pub fn level(&self) -> IncrementLevel {
        self.level
    }

    fn increment_to(&mut self, level: IncrementLevel) {
        if level > self.level {
            self.level = level;
        }
    }

    pub fn increment_major(&mut self) {
        self.increment_to(IncrementLevel::Major);
    }

    pub fn increment_minor(&mut self) {
        self.increment_to(IncrementLevel::Minor);
    }

    pub fn increment_patch(&mut self) {
        self.increment_to(IncrementLevel::Patch);
    }

    pub fn increment_build(&mut self) {
        self.increment_to(IncrementLevel::Build);
    }

    /// Bump the field matching the level; lower fields are left alone
    ///
    /// Fails without touching `version` when the field is already at `u64::MAX`.
    pub fn apply(&self, version: &mut VersionInfo) -> Result<()> {
        let (name, field) = match self.level {
            IncrementLevel::Major => ("major", &mut version.major),
            IncrementLevel::Minor => ("minor", &mut version.minor),
            IncrementLevel::Patch => ("patch", &mut version.patch),
            IncrementLevel::Build => ("build", &mut version.build),
        };
        let value = *field;
        *field = value
            .checked_add(1)
            .ok_or_else(|| SemtagError::overflow(name, value))?;
        Ok(())
    }
}
