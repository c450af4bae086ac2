//! Error types for mining and clustering.

use thiserror::Error;

/// Errors that can occur while mining or clustering a corpus.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MineError {
    /// Invalid parameter value or combination.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Corpus with no rows or no columns.
    #[error("empty feature matrix: {rows} rows x {cols} columns")]
    EmptyMatrix { rows: usize, cols: usize },

    /// A corpus row failed validation during construction.
    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// Dimension mismatch between a centroid and the feature matrix.
    #[error("dimension mismatch: matrix has {expected} columns, centroid has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// No candidate groups reached the linkage step.
    #[error("no candidate groups to cluster; lower the cutoff or the band width r")]
    NoCandidates,

    /// Every merged cluster fell below the minimum size.
    #[error("no cluster met the minimum size {min_cluster_size}; lower it or the similarity threshold")]
    NoClusters { min_cluster_size: usize },

    /// A cluster reached the centroid builder with zero total membership weight.
    #[error("cluster {cluster} has zero total membership weight ({members} distinct members)")]
    DegenerateCluster { cluster: usize, members: usize },

    /// Mining produced more candidate groups than the configured budget.
    #[error("mined {groups} candidate groups, budget is {budget}; raise the cutoff or the band width r")]
    CandidateBudget { groups: usize, budget: usize },
}

/// Result type for mining operations.
pub type Result<T> = std::result::Result<T, MineError>;
