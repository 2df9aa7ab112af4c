use serde::{Deserialize, Serialize};
use std::fmt;

/// How official a build is, from "not a release" up to a final release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReleaseChannel {
    #[default]
    None,
    Alpha,
    Beta,
    Gamma,
    Final,
}

impl ReleaseChannel {
    /// Every channel except `None` marks a release
    pub fn is_release(self) -> bool {
        self != ReleaseChannel::None
    }

    /// Ordering weight used for tie-breaking and thresholds
    pub fn priority(self) -> u8 {
        match self {
            ReleaseChannel::None => 0,
            ReleaseChannel::Alpha => 1,
            ReleaseChannel::Beta => 2,
            ReleaseChannel::Gamma => 3,
            ReleaseChannel::Final => 4,
        }
    }

    /// Lowest channel that still counts as a release
    pub fn lowest_release() -> Self {
        ReleaseChannel::Alpha
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseChannel::None => "NONE",
            ReleaseChannel::Alpha => "ALPHA",
            ReleaseChannel::Beta => "BETA",
            ReleaseChannel::Gamma => "GAMMA",
            ReleaseChannel::Final => "FINAL",
        };
        write!(f, "{}", name)
    }
}
