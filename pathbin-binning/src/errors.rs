use thiserror::Error;

use pathbin_core::GraphError;
use pathbin_core::models::NodeId;

#[derive(Error, Debug)]
pub enum BinningError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Graph consistency error on path '{path}' at node {node}: {reason}")]
    GraphConsistency {
        path: String,
        node: NodeId,
        reason: String,
    },

    #[error("Path '{path}' declares {expected} bp but its steps cover {found} bp")]
    LengthMismatch {
        path: String,
        expected: u64,
        found: u64,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Path '{0}' was enumerated by the graph but has no traversal data")]
    UnknownPath(String),

    #[error("Paths folded into group '{group}' disagree on bin count: expected {expected}, found {found}")]
    GroupBinCountMismatch {
        group: String,
        expected: usize,
        found: usize,
    },

    #[error("Failed to build the thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl BinningError {
    ///
    /// Configuration errors leave the graph untouched and can be retried with
    /// corrected options. Everything else aborts the run.
    ///
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            BinningError::InvalidParameter(_) | BinningError::GroupBinCountMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BinningError>;
