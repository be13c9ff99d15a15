//! The interface every max-flow algorithm implements.

use mf_graph::{ResidualEdge, ResidualGraph};

use crate::error::{SolverError, SolverResult};

/// A max-flow algorithm bound to one residual graph and one source/sink pair.
///
/// The edge kind is part of the algorithm's type: augmenting-path methods use
/// plain edges, label-based methods use edges with a reverse-capacity cache.
pub trait MaxFlowAlgorithm: Sized {
    type Edge: ResidualEdge;

    /// Take ownership of `graph` and prepare to route flow from `source` to `sink`.
    ///
    /// `threads` is the worker count for parallel algorithms; sequential ones
    /// ignore it.
    fn new(
        graph: ResidualGraph<Self::Edge>,
        source: usize,
        sink: usize,
        threads: usize,
    ) -> SolverResult<Self>;

    /// Compute the maximum flow value, leaving the residual graph in its final state.
    fn find_max_flow(&mut self) -> SolverResult<<Self::Edge as ResidualEdge>::Cap>;

    /// The residual graph as it currently stands.
    fn graph(&self) -> &ResidualGraph<Self::Edge>;
}

/// Reject terminals that are out of range or identical.
pub(crate) fn check_terminals<E: ResidualEdge>(
    graph: &ResidualGraph<E>,
    source: usize,
    sink: usize,
) -> SolverResult<()> {
    let n = graph.vertex_count();
    if source >= n || sink >= n {
        return Err(SolverError::ProblemSetup {
            what: format!("terminals ({source}, {sink}) out of range for {n} vertices"),
        });
    }
    if source == sink {
        return Err(SolverError::ProblemSetup {
            what: format!("source and sink are both vertex {source}"),
        });
    }
    Ok(())
}

/// Worker pool for parallel algorithms.
pub(crate) fn worker_pool(threads: usize) -> SolverResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(SolverError::ProblemSetup {
            what: "thread count must be at least 1".to_string(),
        });
    }
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("mf-worker-{i}"))
        .build()?)
}

/// Build algorithm `A` over `graph` and run it to completion.
pub fn solve_with<A: MaxFlowAlgorithm>(
    graph: ResidualGraph<A::Edge>,
    source: usize,
    sink: usize,
    threads: usize,
) -> SolverResult<<A::Edge as ResidualEdge>::Cap> {
    A::new(graph, source, sink, threads)?.find_max_flow()
}
