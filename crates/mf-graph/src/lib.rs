//! mf-graph: residual graph construction for max-flow solvers.
//!
//! Provides:
//! - Edge records, plain and with a reverse-capacity cache
//! - Typed views over dense matrices and sparse triplets
//! - Dense and sparse capacity readers producing flat edge-pair lists
//! - A two-phase assembler resolving mutual reverse-edge indices
//! - Linkage and cache validation
//!
//! # Example
//!
//! ```
//! use mf_graph::{BasicEdge, ResidualEdge, load_dense};
//!
//! // 0 -> 1 with capacity 4
//! let graph = load_dense::<BasicEdge<u32, u32>>(&[0, 4, 0, 0], 2).unwrap();
//!
//! assert_eq!(graph.edge_count(), 2);
//! assert_eq!(graph.edge(0, 0).residual_capacity(), 4);
//! assert_eq!(graph.mirror(0, 0).dst(), 0);
//! ```

pub mod builder;
pub mod dense;
pub mod edge;
pub mod edge_list;
pub mod error;
pub mod graph;
pub mod input;
pub mod sparse;
pub mod validate;

// Re-exports for ergonomics
pub use builder::{GraphBuilder, load_dense, load_sparse};
pub use dense::read_dense;
pub use edge::{BasicEdge, CachedEdge, CachedResidualEdge, ResidualEdge};
pub use edge_list::{EdgeList, PendingEdge};
pub use error::{GraphError, GraphResult};
pub use graph::ResidualGraph;
pub use input::{DenseCapacities, SparseTriplets};
pub use sparse::{MergeRule, read_sparse};
pub use validate::{validate_linkage, validate_reverse_cache};
