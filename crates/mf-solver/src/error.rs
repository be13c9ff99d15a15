//! Error types for solver operations.

use mf_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while computing a maximum flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Flow overflow: {what} exceeds the capacity type")]
    FlowOverflow { what: &'static str },

    #[error("Invalid state: {what}")]
    InvalidState { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<rayon::ThreadPoolBuildError> for SolverError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        SolverError::InvalidState {
            what: format!("failed to start worker pool: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SolverError::FlowOverflow { what: "sink excess" };
        assert!(err.to_string().contains("sink excess"));

        let err: SolverError = GraphError::CapacityOverflow { src: 1, dst: 2 }.into();
        assert!(err.to_string().contains("1 -> 2"));
    }
}
