use thiserror::Error;

/// Errors returned by the clustering algorithms in this crate.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// `clusters()` was called before `fit()`.
    #[error("clusters are not available, call fit() first")]
    NotYetFitted,

    /// An item in a context has senses, but none of them scored a finite
    /// similarity, so no sense could be selected for it.
    #[error("no sense of {item} is selectable from the context")]
    SenseUnresolved {
        /// Rendering of the offending item.
        item: String,
    },

    /// The sense graph lost edges relative to the input graph, which means
    /// disambiguation dropped a neighbor it must not have.
    #[error("sense graph has {actual} edges, expected at least {expected}")]
    CorruptSenseGraph {
        /// Edge count of the input graph.
        expected: usize,
        /// Edge count of the sense graph.
        actual: usize,
    },

    /// The input graph violates the preconditions of the algorithms.
    #[error("invalid input graph: {0}")]
    InvalidGraph(&'static str),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
