//! Graph construction and validation errors.

use mf_core::MfError;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while reading capacity buffers or assembling a residual graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Buffer shape or size is unusable; raised before any edge is materialized.
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    /// A sparse triplet names a vertex outside `[0, n)`.
    #[error("{what} index {index} at position {position} is out of range for {n} vertices")]
    IndexOutOfRange {
        what: &'static str,
        position: usize,
        index: u64,
        n: usize,
    },

    /// Accumulating capacity between `src` and `dst` overflowed the capacity type.
    #[error("Capacity overflow while merging edge {src} -> {dst}")]
    CapacityOverflow { src: u64, dst: u64 },

    /// An edge's reverse index does not point back at it.
    #[error("Broken reverse linkage at vertex {vertex}, slot {slot}")]
    BrokenLinkage { vertex: usize, slot: usize },

    /// A cached reverse capacity differs from its mirror's residual capacity.
    #[error("Stale reverse capacity cache at vertex {vertex}, slot {slot}")]
    StaleReverseCache { vertex: usize, slot: usize },
}

impl GraphError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        GraphError::InvalidInput { what: what.into() }
    }
}

impl From<MfError> for GraphError {
    fn from(err: MfError) -> Self {
        GraphError::InvalidInput {
            what: err.to_string(),
        }
    }
}
