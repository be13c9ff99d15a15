//! Load and run entry points.
//!
//! Loading turns caller buffers into a [`StoredGraph`] of the requested widths and
//! edge layout, registering it when the persist policy asks for that. Running
//! picks the solver for an [`AlgorithmId`], instantiates it at the graph's
//! precision, and solves on a private copy so a registered graph is never
//! modified.

use mf_core::timing::Timer;
use mf_core::{Capacity, VertexIndex};
use mf_graph::{
    BasicEdge, CachedEdge, DenseCapacities, GraphBuilder, ResidualEdge, ResidualGraph,
    SparseTriplets,
};
use mf_solver::{
    AhujaOrlin, AhujaOrlinSegment, Dinic, EdmondsKarp, MaxFlowAlgorithm, ParallelPushRelabel,
    PushRelabelFifo, PushRelabelHighest, PushRelabelSegment, solve_with,
};
use tracing::{debug, info, instrument};

use crate::catalog::{AlgorithmId, EdgeKind, PrecisionMode};
use crate::error::{AppError, AppResult};
use crate::options::{LoadOptions, RunOptions};
use crate::registry::{GraphHandle, GraphRegistry, StoredGraph};

/// Result of a load.
///
/// `graph` is present unless the policy was save-only; `handle` is present unless
/// the policy was discard-after-use.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub graph: Option<StoredGraph>,
    pub handle: Option<GraphHandle>,
}

/// Result of a one-shot load-and-solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOutcome {
    /// Maximum flow value, absent for save-only loads.
    pub flow: Option<u64>,
    pub handle: Option<GraphHandle>,
}

/// Where a run takes its graph from.
#[derive(Debug, Clone, Copy)]
pub enum GraphSource<'a> {
    Graph(&'a StoredGraph),
    Handle(GraphHandle),
}

/// Check a solve request before any solver is built.
pub fn validate_request(n: usize, source: usize, sink: usize, threads: usize) -> AppResult<()> {
    if n < 2 {
        return Err(AppError::invalid(format!(
            "a network needs at least 2 vertices, got {n}"
        )));
    }
    if source >= n {
        return Err(AppError::invalid(format!(
            "source {source} is not below the vertex count {n}"
        )));
    }
    if sink >= n {
        return Err(AppError::invalid(format!(
            "sink {sink} is not below the vertex count {n}"
        )));
    }
    if source == sink {
        return Err(AppError::invalid("source and sink must be different vertices"));
    }
    if threads == 0 {
        return Err(AppError::invalid("thread count must be at least 1"));
    }
    Ok(())
}

fn build<E: ResidualEdge>(builder: GraphBuilder<E>) -> AppResult<StoredGraph> {
    Ok(StoredGraph::new(builder.build()?))
}

fn persist(registry: &mut GraphRegistry, graph: StoredGraph, options: &LoadOptions) -> Loaded {
    let handle = options
        .persist
        .saves()
        .then(|| registry.insert(graph.clone()));
    let graph = options.persist.uses().then_some(graph);
    Loaded { graph, handle }
}

/// Build a graph from a row-major `n × n` capacity buffer.
///
/// Nothing is registered when building fails.
#[instrument(level = "debug", skip(registry, data), fields(len = data.len()))]
pub fn load_dense<V: VertexIndex, C: Capacity>(
    registry: &mut GraphRegistry,
    data: &[C],
    n: usize,
    options: &LoadOptions,
) -> AppResult<Loaded> {
    let timer = Timer::start("load_dense");
    let matrix = DenseCapacities::new(data, n)?;
    let graph = match options.edges {
        EdgeKind::Basic => build(GraphBuilder::<BasicEdge<V, C>>::from_dense(&matrix)?)?,
        EdgeKind::Cached => build(GraphBuilder::<CachedEdge<V, C>>::from_dense(&matrix)?)?,
    };
    timer.stop_and_log();
    debug!(kind = %graph.kind(), edges = graph.edge_count(), "dense graph loaded");
    Ok(persist(registry, graph, options))
}

/// Build a graph from `m` sparse `(row, col, capacity)` triplets.
///
/// Nothing is registered when building fails.
#[instrument(level = "debug", skip(registry, rows, cols, capacities))]
pub fn load_sparse<V: VertexIndex, C: Capacity>(
    registry: &mut GraphRegistry,
    rows: &[V],
    cols: &[V],
    capacities: &[C],
    n: usize,
    m: usize,
    options: &LoadOptions,
) -> AppResult<Loaded> {
    let timer = Timer::start("load_sparse");
    let triplets = SparseTriplets::with_len(rows, cols, capacities, n, m)?;
    let graph = match options.edges {
        EdgeKind::Basic => build(GraphBuilder::<BasicEdge<V, C>>::from_sparse(
            &triplets,
            options.merge,
        )?)?,
        EdgeKind::Cached => build(GraphBuilder::<CachedEdge<V, C>>::from_sparse(
            &triplets,
            options.merge,
        )?)?,
    };
    timer.stop_and_log();
    debug!(kind = %graph.kind(), edges = graph.edge_count(), "sparse graph loaded");
    Ok(persist(registry, graph, options))
}

/// A private copy of `graph` in the edge layout `E` needs.
fn working_copy<E: ResidualEdge>(graph: &StoredGraph) -> AppResult<ResidualGraph<E>> {
    match graph.kind().edges {
        EdgeKind::Basic => Ok(graph
            .downcast::<BasicEdge<E::Vertex, E::Cap>>()?
            .to_edge_kind()),
        EdgeKind::Cached => Ok(graph
            .downcast::<CachedEdge<E::Vertex, E::Cap>>()?
            .to_edge_kind()),
    }
}

fn solve_one<A: MaxFlowAlgorithm>(
    graph: &StoredGraph,
    source: usize,
    sink: usize,
    threads: usize,
) -> AppResult<u64> {
    let working = working_copy::<A::Edge>(graph)?;
    let flow = solve_with::<A>(working, source, sink, threads)?;
    Ok(flow.widen())
}

fn solve_at<V: VertexIndex, C: Capacity>(
    algorithm: AlgorithmId,
    graph: &StoredGraph,
    source: usize,
    sink: usize,
    threads: usize,
) -> AppResult<u64> {
    match algorithm {
        AlgorithmId::EdmondsKarp => solve_one::<EdmondsKarp<V, C>>(graph, source, sink, threads),
        AlgorithmId::Dinic => solve_one::<Dinic<V, C>>(graph, source, sink, threads),
        AlgorithmId::PushRelabelFifo => {
            solve_one::<PushRelabelFifo<V, C>>(graph, source, sink, threads)
        }
        AlgorithmId::PushRelabelHighestLabel => {
            solve_one::<PushRelabelHighest<V, C>>(graph, source, sink, threads)
        }
        AlgorithmId::AhujaOrlin => solve_one::<AhujaOrlin<V, C>>(graph, source, sink, threads),
        AlgorithmId::ParallelPushRelabel => {
            solve_one::<ParallelPushRelabel<V, C>>(graph, source, sink, threads)
        }
        AlgorithmId::PushRelabelSegmented => {
            solve_one::<PushRelabelSegment<V, C>>(graph, source, sink, threads)
        }
        AlgorithmId::AhujaOrlinSegmented => {
            solve_one::<AhujaOrlinSegment<V, C>>(graph, source, sink, threads)
        }
    }
}

/// Compute the maximum flow from `source` to `sink` with `algorithm`.
///
/// Runs never modify the graph they read, so repeated runs against one handle
/// return the same value.
#[instrument(level = "debug", skip(registry, graph, options))]
pub fn run(
    registry: &GraphRegistry,
    algorithm: AlgorithmId,
    graph: GraphSource<'_>,
    source: usize,
    sink: usize,
    options: &RunOptions,
) -> AppResult<u64> {
    let stored;
    let graph = match graph {
        GraphSource::Graph(graph) => graph,
        GraphSource::Handle(handle) => {
            stored = registry.get(handle)?;
            &stored
        }
    };
    run_stored(algorithm, graph, source, sink, options)
}

/// [`run`] against a graph already in hand.
pub fn run_stored(
    algorithm: AlgorithmId,
    graph: &StoredGraph,
    source: usize,
    sink: usize,
    options: &RunOptions,
) -> AppResult<u64> {
    validate_request(graph.vertex_count(), source, sink, options.threads)?;
    let precision = graph.kind().precision;
    if let Some(expected) = options.precision
        && expected != precision
    {
        return Err(AppError::invalid(format!(
            "graph was loaded as {precision}, run asked for {expected}"
        )));
    }

    let timer = Timer::start("run");
    let threads = options.threads;
    let flow = match precision {
        PrecisionMode::U32U32 => solve_at::<u32, u32>(algorithm, graph, source, sink, threads),
        PrecisionMode::U32U64 => solve_at::<u32, u64>(algorithm, graph, source, sink, threads),
        PrecisionMode::U64U32 => solve_at::<u64, u32>(algorithm, graph, source, sink, threads),
        PrecisionMode::U64U64 => solve_at::<u64, u64>(algorithm, graph, source, sink, threads),
    }?;
    let elapsed_s = timer.stop_and_log();
    info!(%algorithm, %precision, source, sink, flow, ?elapsed_s, "max flow computed");
    Ok(flow)
}

/// Load a dense network and, unless the policy is save-only, solve it.
#[allow(clippy::too_many_arguments)]
pub fn max_flow_dense<V: VertexIndex, C: Capacity>(
    registry: &mut GraphRegistry,
    algorithm: AlgorithmId,
    data: &[C],
    n: usize,
    source: usize,
    sink: usize,
    load: &LoadOptions,
    options: &RunOptions,
) -> AppResult<FlowOutcome> {
    let loaded = load_dense::<V, C>(registry, data, n, load)?;
    finish(algorithm, loaded, source, sink, options)
}

/// Load a sparse network and, unless the policy is save-only, solve it.
#[allow(clippy::too_many_arguments)]
pub fn max_flow_sparse<V: VertexIndex, C: Capacity>(
    registry: &mut GraphRegistry,
    algorithm: AlgorithmId,
    rows: &[V],
    cols: &[V],
    capacities: &[C],
    n: usize,
    source: usize,
    sink: usize,
    load: &LoadOptions,
    options: &RunOptions,
) -> AppResult<FlowOutcome> {
    let loaded = load_sparse(registry, rows, cols, capacities, n, rows.len(), load)?;
    finish(algorithm, loaded, source, sink, options)
}

/// Solve a freshly loaded graph when the policy hands one back.
///
/// A failed run leaves a saved graph registered.
fn finish(
    algorithm: AlgorithmId,
    loaded: Loaded,
    source: usize,
    sink: usize,
    options: &RunOptions,
) -> AppResult<FlowOutcome> {
    let flow = loaded
        .graph
        .as_ref()
        .map(|graph| run_stored(algorithm, graph, source, sink, options))
        .transpose()?;
    Ok(FlowOutcome {
        flow,
        handle: loaded.handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PersistPolicy;

    #[rustfmt::skip]
    const DIAMOND: [u64; 16] = [
        0, 10, 10, 0,
        0, 0,  0,  10,
        0, 0,  0,  10,
        0, 0,  0,  0,
    ];

    #[test]
    fn validate_request_rules() {
        assert!(validate_request(4, 0, 3, 1).is_ok());
        assert!(validate_request(1, 0, 0, 1).is_err());
        assert!(validate_request(4, 4, 3, 1).is_err());
        assert!(validate_request(4, 0, 9, 1).is_err());
        assert!(validate_request(4, 2, 2, 1).is_err());
        assert!(validate_request(4, 0, 3, 0).is_err());
    }

    #[test]
    fn discard_after_use_registers_nothing() {
        let mut reg = GraphRegistry::new();
        let out = max_flow_dense::<u32, u64>(
            &mut reg,
            AlgorithmId::Dinic,
            &DIAMOND,
            4,
            0,
            3,
            &LoadOptions::default(),
            &RunOptions::default(),
        )
        .unwrap();
        assert_eq!(out, FlowOutcome { flow: Some(20), handle: None });
        assert!(reg.is_empty());
    }

    #[test]
    fn save_only_returns_handle_without_flow() {
        let mut reg = GraphRegistry::new();
        let load = LoadOptions::default().with_persist(PersistPolicy::SaveOnly);
        let out = max_flow_dense::<u64, u64>(
            &mut reg,
            AlgorithmId::EdmondsKarp,
            &DIAMOND,
            4,
            0,
            3,
            &load,
            &RunOptions::default(),
        )
        .unwrap();
        assert_eq!(out.flow, None);
        let handle = out.handle.unwrap();
        assert_eq!(reg.handles(), vec![handle]);
    }

    #[test]
    fn precision_mismatch_is_rejected() {
        let mut reg = GraphRegistry::new();
        let loaded = load_dense::<u32, u64>(&mut reg, &DIAMOND, 4, &LoadOptions::default()).unwrap();
        let graph = loaded.graph.unwrap();
        let err = run(
            &reg,
            AlgorithmId::Dinic,
            GraphSource::Graph(&graph),
            0,
            3,
            &RunOptions::default().with_precision(PrecisionMode::U64U64),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn failed_load_leaves_registry_untouched() {
        let mut reg = GraphRegistry::new();
        let load = LoadOptions::default().with_persist(PersistPolicy::SaveAndUse);
        let err = load_sparse::<u32, u32>(&mut reg, &[0, 5], &[1, 1], &[3, 3], 3, 2, &load)
            .unwrap_err();
        assert!(matches!(err, AppError::IndexOutOfRange(_)));
        assert!(reg.is_empty());

        let err = load_dense::<u32, u32>(&mut reg, &[0, 1, 2], 2, &load).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(reg.is_empty());

        // The next successful load still gets the first handle.
        let ok = load_dense::<u32, u32>(&mut reg, &[0, 1, 0, 0], 2, &load).unwrap();
        assert_eq!(ok.handle, Some(GraphHandle::new(0)));
    }

    #[test]
    fn sparse_length_mismatch_is_invalid_input() {
        let mut reg = GraphRegistry::new();
        let err = load_sparse::<u64, u64>(
            &mut reg,
            &[0, 1],
            &[1],
            &[4, 4],
            2,
            2,
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
