//! Workflows behind the command-line interface

pub mod orchestration;

pub use orchestration::{
    resolve_changelog, resolve_version, ChangelogOutcome, ResolveOptions, VersionOutcome,
};
