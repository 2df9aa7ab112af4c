//! Tag indexing and commit-graph queries for version resolution

pub mod graph;
pub mod version_analyzer;

pub use graph::{ancestors_of, Ancestry};
pub use version_analyzer::Analyzer;
