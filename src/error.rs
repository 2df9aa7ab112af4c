use thiserror::Error;

/// Unified error type for git-semtag operations
#[derive(Error, Debug)]
pub enum SemtagError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Traversal error: {0}")]
    Traversal(String),

    #[error("Cannot disambiguate tag '{tag}': version pattern has no {{build}} placeholder")]
    Disambiguation { tag: String },

    #[error("Version overflow: {field} cannot be incremented past {value}")]
    VersionOverflow { field: &'static str, value: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-semtag
pub type Result<T> = std::result::Result<T, SemtagError>;

impl SemtagError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemtagError::Config(msg.into())
    }

    /// Create a traversal error with context
    pub fn traversal(msg: impl Into<String>) -> Self {
        SemtagError::Traversal(msg.into())
    }

    /// Overflow error for a version field that can't be incremented
    pub fn overflow(field: &'static str, value: u64) -> Self {
        SemtagError::VersionOverflow { field, value }
    }

    /// Whether the caller may recover by accepting a colliding tag
    pub fn is_disambiguation(&self) -> bool {
        matches!(self, SemtagError::Disambiguation { .. })
    }
}
