//! Excess scaling with parallel synchronous rounds over vertex segments.

use mf_core::{Capacity, VertexIndex};
use mf_graph::{CachedEdge, ResidualGraph};
use tracing::{debug, trace};

use crate::algorithm::{MaxFlowAlgorithm, worker_pool};
use crate::error::SolverResult;
use crate::preflow::{Preflow, Relabel, widen};
use crate::sync_rounds::{self, scan_segments};

pub struct AhujaOrlinSegment<V, C> {
    state: Preflow<V, C>,
    pool: rayon::ThreadPool,
    segments: usize,
}

fn run<V: VertexIndex, C: Capacity>(
    state: &mut Preflow<V, C>,
    segments: usize,
) -> SolverResult<usize> {
    state.initialize()?;
    let mut delta = state.max_residual().power_of_two_ceiling();
    let mut rounds = 0_usize;

    while !delta.is_zero() {
        trace!(delta = %delta, "scaling phase");
        let threshold = widen(delta.halve());
        loop {
            let excess = &state.excess;
            let active = scan_segments(state, segments, |v| excess[v] > threshold);
            if active.is_empty() {
                break;
            }
            sync_rounds::round(state, &active, Some(delta))?;
            rounds += 1;
            if state.needs_global_relabel() {
                state.global_relabel();
            }
        }
        delta = delta.halve();
    }
    Ok(rounds)
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for AhujaOrlinSegment<V, C> {
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
            "segmented ahuja-orlin finished"
        );
        Ok(flow)
    }

    fn graph(&self) -> &ResidualGraph<Self::Edge> {
        &self.state.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_graph::{MergeRule, load_sparse, validate_reverse_cache};

    #[test]
    fn classic_six_vertex_network() {
        let rows = [0, 0, 1, 1, 2, 3, 4, 4];
        let cols = [1, 2, 3, 4, 4, 5, 3, 5];
        let caps = [10, 10, 4, 8, 9, 10, 6, 10];
        for threads in [1, 3] {
            let g = load_sparse::<CachedEdge<u64, u32>>(
                &rows,
                &cols,
                &caps,
                6,
                MergeRule::OppositeOnly,
            )
            .unwrap();
            let mut solver = AhujaOrlinSegment::new(g, 0, 5, threads).unwrap();
            assert_eq!(solver.find_max_flow().unwrap(), 19);
            assert!(validate_reverse_cache(solver.graph()).is_ok());
        }
    }

    #[test]
    fn no_edges_means_no_flow() {
        let g = load_sparse::<CachedEdge<u32, u32>>(&[], &[], &[], 4, MergeRule::OppositeOnly)
            .unwrap();
        let mut solver = AhujaOrlinSegment::new(g, 0, 3, 2).unwrap();
        assert_eq!(solver.find_max_flow().unwrap(), 0);
    }
}
