use std::io;
use thiserror::Error;

use pathbin_core::GraphError;

/// Error type for GFA loading.
#[derive(Error, Debug)]
pub enum GfaError {
    /// IO error occurred while reading the input.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be parsed.
    #[error("Malformed GFA record on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The records parse but do not describe a consistent graph.
    #[error("Inconsistent graph: {0}")]
    Graph(#[from] GraphError),
}

/// Result type alias for pathbin-io operations.
pub type Result<T> = std::result::Result<T, GfaError>;
