//! Error types for the mf-app service layer.

use mf_graph::GraphError;
use mf_solver::SolverError;

use crate::registry::GraphHandle;

/// Errors surfaced at the load/run/destroy boundary.
///
/// Every lower-level error is folded into one of these kinds; the original
/// message is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    #[error("Capacity overflow: {0}")]
    CapacityOverflow(String),

    #[error("Unknown graph handle: {0}")]
    InvalidHandle(GraphHandle),

    #[error("Solver failure: {0}")]
    SolverFailure(String),
}

/// Result type for mf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        AppError::InvalidInput(what.into())
    }
}

// Conversions from backend error types
impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::InvalidInput { .. } => AppError::InvalidInput(err.to_string()),
            GraphError::IndexOutOfRange { .. } => AppError::IndexOutOfRange(err.to_string()),
            GraphError::CapacityOverflow { .. } => AppError::CapacityOverflow(err.to_string()),
            GraphError::BrokenLinkage { .. } | GraphError::StaleReverseCache { .. } => {
                AppError::SolverFailure(err.to_string())
            }
        }
    }
}

impl From<SolverError> for AppError {
    fn from(err: SolverError) -> Self {
        AppError::SolverFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_errors_keep_their_kind() {
        let err: AppError = GraphError::IndexOutOfRange {
            what: "col",
            position: 0,
            index: 7,
            n: 3,
        }
        .into();
        assert!(matches!(err, AppError::IndexOutOfRange(_)));

        let err: AppError = GraphError::CapacityOverflow { src: 0, dst: 1 }.into();
        assert!(matches!(err, AppError::CapacityOverflow(_)));
    }

    #[test]
    fn solver_errors_collapse_to_one_kind() {
        let err: AppError = SolverError::FlowOverflow { what: "total flow" }.into();
        assert!(matches!(err, AppError::SolverFailure(_)));

        let err: AppError = SolverError::Graph(GraphError::CapacityOverflow { src: 0, dst: 1 }).into();
        assert!(matches!(err, AppError::SolverFailure(_)));
    }
}
