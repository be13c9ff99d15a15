//! Parallel push-relabel over contiguous vertex segments.
//!
//! Instead of maintaining an active list, every round rediscovers the active
//! vertices by scanning one contiguous vertex range per worker.

use mf_core::{Capacity, VertexIndex};
use mf_graph::{CachedEdge, ResidualGraph};
use tracing::debug;

use crate::algorithm::{MaxFlowAlgorithm, worker_pool};
use crate::error::SolverResult;
use crate::preflow::{Preflow, Relabel};
use crate::sync_rounds::{self, scan_segments};

pub struct PushRelabelSegment<V, C> {
    state: Preflow<V, C>,
    pool: rayon::ThreadPool,
    segments: usize,
}

fn run<V: VertexIndex, C: Capacity>(
    state: &mut Preflow<V, C>,
    segments: usize,
) -> SolverResult<usize> {
    state.initialize()?;
    let mut rounds = 0_usize;
    loop {
        let active = scan_segments(state, segments, |_| true);
        if active.is_empty() {
            return Ok(rounds);
        }
        sync_rounds::round(state, &active, None)?;
        rounds += 1;
        if state.needs_global_relabel() {
            state.global_relabel();
        }
    }
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for PushRelabelSegment<V, C> {
    type Edge = CachedEdge<V, C>;

    fn new(
        graph: ResidualGraph<Self::Edge>,
        source: usize,
        sink: usize,
        threads: usize,
    ) -> SolverResult<Self> {
        let pool = worker_pool(threads)?;
        Ok(Self {
            state: Preflow::new(graph, source, sink, Relabel::Parallel)?,
            pool,
            segments: threads,
        })
    }

    fn find_max_flow(&mut self) -> SolverResult<C> {
        let Self {
            state,
            pool,
            segments,
        } = self;
        let segments = *segments;
        let rounds = pool.install(|| run(state, segments))?;

        let flow = state.flow_value()?;
        debug!(
            rounds,
            segments,
            global_relabels = state.global_relabels,
            %flow,
            "segmented push-relabel finished"
        );
        Ok(flow)
    }

    fn graph(&self) -> &ResidualGraph<Self::Edge> {
        &self.state.graph
    }
}
