use thiserror::Error;

/// Core error type shared across Tablesmith crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input was rejected before any state changed.
    #[error("validation error: {0}")]
    Validation(String),
    /// A positional column operation addressed a column that does not exist.
    #[error("column index {index} out of range (schema has {len} columns)")]
    Index { index: usize, len: usize },
    /// A schema exchange document could not be read or written.
    #[error("invalid schema document: {0}")]
    Exchange(String),
}

/// Convenience alias for results returned by Tablesmith crates.
pub type Result<T> = std::result::Result<T, Error>;
