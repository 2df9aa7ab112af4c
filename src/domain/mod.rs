//! Domain logic - pure versioning rules independent of git operations

pub mod branch;
pub mod commit;
pub mod increment;
pub mod release_channel;
pub mod tag;
pub mod version;
pub mod version_pattern;

pub use branch::{BranchConfig, BranchPattern};
pub use commit::{ChangeKind, CommitClassifier, CommitInfo, ParsedCommit};
pub use increment::{IncrementLevel, VersionIncrement};
pub use release_channel::ReleaseChannel;
pub use tag::{Tag, TagSet};
pub use version::VersionInfo;
pub use version_pattern::{sanitize_branch, VersionPattern};
