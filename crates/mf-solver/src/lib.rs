//! Maximum-flow algorithms over residual graphs.
//!
//! Two augmenting-path methods run on plain edges:
//! - [`EdmondsKarp`]
//! - [`Dinic`]
//!
//! Six preflow methods run on edges with a reverse-capacity cache:
//! - [`PushRelabelFifo`], [`PushRelabelHighest`] and [`AhujaOrlin`] (sequential)
//! - [`ParallelPushRelabel`], [`PushRelabelSegment`] and [`AhujaOrlinSegment`]
//!   (synchronous rounds on a rayon pool)
//!
//! Every solver implements [`MaxFlowAlgorithm`] and is generic over the vertex
//! index and capacity widths.

pub mod ahuja_orlin;
pub mod ahuja_orlin_segment;
pub mod algorithm;
pub mod dinic;
pub mod edmonds_karp;
pub mod error;
mod labels;
pub mod parallel_push_relabel;
mod preflow;
pub mod push_relabel_fifo;
pub mod push_relabel_highest;
pub mod push_relabel_segment;
mod sync_rounds;

pub use ahuja_orlin::AhujaOrlin;
pub use ahuja_orlin_segment::AhujaOrlinSegment;
pub use algorithm::{MaxFlowAlgorithm, solve_with};
pub use dinic::Dinic;
pub use edmonds_karp::EdmondsKarp;
pub use error::{SolverError, SolverResult};
pub use parallel_push_relabel::ParallelPushRelabel;
pub use push_relabel_fifo::PushRelabelFifo;
pub use push_relabel_highest::PushRelabelHighest;
pub use push_relabel_segment::PushRelabelSegment;
