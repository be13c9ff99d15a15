//! Service layer for the max-flow workspace.
//!
//! This crate is the boundary callers talk to: it turns raw capacity buffers into
//! graphs, keeps long-lived graphs in a handle registry, and dispatches a run to
//! any of the eight algorithms at any of the four precisions.

pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod options;
pub mod registry;
pub mod session;

// Re-export key types for convenience
pub use catalog::{AlgorithmId, EdgeKind, PrecisionMode, algorithm_names};
pub use dispatch::{
    FlowOutcome, GraphSource, Loaded, load_dense, load_sparse, max_flow_dense, max_flow_sparse,
    run, run_stored, validate_request,
};
pub use error::{AppError, AppResult};
pub use options::{LoadOptions, PersistPolicy, RunOptions};
pub use registry::{GraphHandle, GraphKind, GraphRegistry, SharedRegistry, StoredGraph};
pub use session::Session;

pub use mf_graph::MergeRule;
