//! Parallel push-relabel driven by a global active-vertex list.

use mf_core::{Capacity, VertexIndex};
use mf_graph::{CachedEdge, ResidualGraph};
use tracing::debug;

use crate::algorithm::{MaxFlowAlgorithm, worker_pool};
use crate::error::SolverResult;
use crate::preflow::{Preflow, Relabel};
use crate::sync_rounds;

pub struct ParallelPushRelabel<V, C> {
    state: Preflow<V, C>,
    pool: rayon::ThreadPool,
    /// Scratch marks used to deduplicate the next active list.
    listed: Vec<bool>,
}

/// Vertices of `previous` and `touched` that are active after the round, once each.
fn next_active<V: VertexIndex, C: Capacity>(
    state: &Preflow<V, C>,
    listed: &mut [bool],
    previous: &[usize],
    touched: &[usize],
) -> Vec<usize> {
    let mut next = Vec::with_capacity(previous.len() + touched.len());
    for &v in previous.iter().chain(touched) {
        if !listed[v] && state.is_active(v) {
            listed[v] = true;
            next.push(v);
        }
    }
    for &v in &next {
        listed[v] = false;
    }
    next
}

fn run<V: VertexIndex, C: Capacity>(
    state: &mut Preflow<V, C>,
    listed: &mut [bool],
) -> SolverResult<usize> {
    state.initialize()?;
    let mut active = state.active_vertices();
    let mut rounds = 0_usize;

    while !active.is_empty() {
        let (_, touched) = sync_rounds::round(state, &active, None)?;
        rounds += 1;
        active = if state.needs_global_relabel() {
            state.global_relabel();
            state.active_vertices()
        } else {
            next_active(state, listed, &active, &touched)
        };
    }
    Ok(rounds)
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for ParallelPushRelabel<V, C> {
    type Edge = CachedEdge<V, C>;

    fn new(
        graph: ResidualGraph<Self::Edge>,
        source: usize,
        sink: usize,
        threads: usize,
    ) -> SolverResult<Self> {
        let pool = worker_pool(threads)?;
        let state = Preflow::new(graph, source, sink, Relabel::Parallel)?;
        let n = state.n();
        Ok(Self {
            state,
            pool,
            listed: vec![false; n],
        })
    }

    fn find_max_flow(&mut self) -> SolverResult<C> {
        let Self {
            state,
            pool,
            listed,
        } = self;
        let rounds = pool.install(|| run(state, listed))?;

        let flow = state.flow_value()?;
        debug!(
            rounds,
            threads = pool.current_num_threads(),
            global_relabels = state.global_relabels,
            %flow,
            "parallel push-relabel finished"
        );
        Ok(flow)
    }

    fn graph(&self) -> &ResidualGraph<Self::Edge> {
        &self.state.graph
    }
}
