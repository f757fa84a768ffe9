use std::path::PathBuf;

use thiserror::Error;

/// Error types for the substitution pipeline and its loaders
///
/// Text input never produces one of these: any string is accepted by the
/// pipeline. Only malformed rule bundles and unreadable resources fail.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A rule triple with the wrong number of fields
    #[error("malformed rule #{index} in {list}: expected 3 fields (old, new, placeholder), found {arity}")]
    MalformedRule {
        list: String,
        index: usize,
        arity: usize,
    },
    /// A resource exists but its content is unusable
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A parallel worker panicked or was cancelled
    #[error("worker failed: {0}")]
    Worker(String),
}

/// Result type for pipeline operations
pub type ConvertResult<T> = Result<T, ConvertError>;
