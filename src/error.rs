//! Error types for trueup.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`AlignError`].
pub type Result<T> = std::result::Result<T, AlignError>;

/// Errors that can occur during grouping, matching, and alignment operations.
///
/// Every variant is a call-level failure: an operation that returns one has
/// produced no position updates, so the host mesh is left untouched.
#[derive(Error, Debug)]
pub enum AlignError {
    /// The snapshot contains no selected vertices.
    #[error("no vertices selected")]
    NoSelection,

    /// Fewer selected vertices than the operation requires.
    #[error("at least {required} selected vertices are required, found {found}")]
    NotEnoughVertices {
        /// Minimum number of selected vertices.
        required: usize,
        /// Number of selected vertices actually present.
        found: usize,
    },

    /// Matching was invoked with an empty group on either side.
    #[error("cannot match against an empty group")]
    EmptyGroup,

    /// Connectivity grouping did not produce the two groups matching needs.
    #[error("expected 2 groups of connected vertices, found {found}")]
    GroupCount {
        /// Number of groups actually found.
        found: usize,
    },

    /// No base group is available to equalize against.
    ///
    /// Raised when the external store has no entry under the requested name,
    /// or when every stored index is stale for the current snapshot.
    #[error("no base group available")]
    MissingBaseGroup,

    /// Length equalization was requested but the moving and base groups share
    /// no edge.
    #[error("no edges connect the moving group to the base group")]
    NoConnectingEdges,

    /// Every selected vertex belongs to the base group, leaving nothing to
    /// move.
    #[error("selection contains no vertices outside the base group")]
    NoMovingVertices,

    /// The selection array does not line up with the vertex array.
    #[error("{flags} selection flags were given for {vertices} vertices")]
    SelectionMismatch {
        /// Number of selection flags supplied.
        flags: usize,
        /// Number of vertex positions supplied.
        vertices: usize,
    },

    /// An edge references a vertex index outside the snapshot.
    #[error("edge {edge} references invalid vertex index {vertex}")]
    InvalidEdge {
        /// The edge index.
        edge: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// An edge connects a vertex to itself.
    #[error("edge {edge} is degenerate (connects a vertex to itself)")]
    DegenerateEdge {
        /// The edge index.
        edge: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AlignError::GroupCount { found: 3 };
        assert_eq!(
            err.to_string(),
            "expected 2 groups of connected vertices, found 3"
        );

        let err = AlignError::NotEnoughVertices {
            required: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "at least 2 selected vertices are required, found 1"
        );
    }
}
