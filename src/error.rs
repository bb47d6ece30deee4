//! Error types.

use thiserror::Error;

/// Errors raised while building a graph, configuring a colony, or
/// looking up graph elements.
///
/// All of them are raised eagerly at construction or solve entry. A
/// degenerate sampling step (every candidate weight zero) is not an error;
/// it falls back to a uniform choice.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// Too few nodes, duplicate indices, or a non-positive distance.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// No edge exists between the two node indices.
    #[error("no edge between nodes {from} and {to}")]
    NotFound {
        /// First endpoint as requested.
        from: usize,
        /// Second endpoint as requested.
        to: usize,
    },

    /// Next-node selection was asked to choose from an empty candidate set.
    #[error("no candidate nodes to move to from node {0}")]
    NoCandidates(usize),

    /// An ant was asked to start from a node that is not in the graph.
    #[error("invalid start node: {0}")]
    InvalidStart(usize),

    /// A parameter lies outside its documented range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AcoError>;
