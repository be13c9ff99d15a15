//! Push-relabel that always discharges an active vertex with the highest label.

use mf_core::{Capacity, VertexIndex};
use mf_graph::{CachedEdge, ResidualEdge, ResidualGraph};
use tracing::debug;

use crate::algorithm::MaxFlowAlgorithm;
use crate::error::SolverResult;
use crate::preflow::{Preflow, Relabel, clamp_push};

pub struct PushRelabelHighest<V, C> {
    state: Preflow<V, C>,
    /// Active vertices bucketed by label.
    buckets: Vec<Vec<usize>>,
    highest: usize,
}

impl<V: VertexIndex, C: Capacity> PushRelabelHighest<V, C> {
    fn insert(&mut self, v: usize) {
        let label = self.state.label[v];
        self.buckets[label].push(v);
        self.highest = self.highest.max(label);
    }

    fn rebuild(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.highest = 0;
        for v in self.state.active_vertices() {
            self.insert(v);
        }
    }

    fn pop_highest(&mut self) -> Option<usize> {
        loop {
            if let Some(v) = self.buckets[self.highest].pop() {
                return Some(v);
            }
            if self.highest == 0 {
                return None;
            }
            self.highest -= 1;
        }
    }

    fn discharge(&mut self, u: usize) -> SolverResult<()> {
        while self.state.is_active(u) {
            let slot = self.state.current[u];
            if slot == self.state.graph.edges(u).len() {
                self.state.relabel(u);
                continue;
            }
            let e = *self.state.graph.edge(u, slot);
            if self.state.is_admissible(u, &e) {
                let amount = clamp_push(self.state.excess[u], e.residual_capacity());
                if self.state.push(u, slot, amount)? {
                    self.insert(e.dst());
                }
            } else {
                self.state.current[u] += 1;
            }
        }
        Ok(())
    }
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for PushRelabelHighest<V, C> {
    type Edge = CachedEdge<V, C>;

    fn new(
        graph: ResidualGraph<Self::Edge>,
        source: usize,
        sink: usize,
        _threads: usize,
    ) -> SolverResult<Self> {
        let state = Preflow::new(graph, source, sink, Relabel::Sequential)?;
        let n = state.n();
        Ok(Self {
            state,
            buckets: vec![Vec::new(); n],
            highest: 0,
        })
    }

    fn find_max_flow(&mut self) -> SolverResult<C> {
        self.state.initialize()?;
        self.rebuild();

        let mut discharges = 0_usize;
        while let Some(u) = self.pop_highest() {
            // A vertex can sit in a bucket after an earlier discharge drained it.
            if !self.state.is_active(u) {
                continue;
            }
            self.discharge(u)?;
            discharges += 1;
            if self.state.needs_global_relabel() {
                self.state.global_relabel();
                self.rebuild();
            }
        }

        let flow = self.state.flow_value()?;
        debug!(
            discharges,
            global_relabels = self.state.global_relabels,
            %flow,
            "highest-label push-relabel finished"
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
    use mf_graph::{MergeRule, load_dense, load_sparse};

    #[test]
    fn classic_six_vertex_network() {
        let rows = [0, 0, 1, 1, 2, 3, 4, 4];
        let cols = [1, 2, 3, 4, 4, 5, 3, 5];
        let caps = [10, 10, 4, 8, 9, 10, 6, 10];
        let g = load_sparse::<CachedEdge<u64, u32>>(&rows, &cols, &caps, 6, MergeRule::OppositeOnly)
            .unwrap();
        let mut solver = PushRelabelHighest::new(g, 0, 5, 1).unwrap();
        assert_eq!(solver.find_max_flow().unwrap(), 19);
    }

    #[test]
    fn flow_back_towards_source_is_returned() {
        // The source's edge into 1 is larger than anything 1 can forward.
        #[rustfmt::skip]
        let data = [
            0, 100, 0, 0,
            0, 0,   4, 0,
            0, 0,   0, 7,
            0, 0,   0, 0,
        ];
        let g = load_dense::<CachedEdge<u32, u64>>(&data, 4).unwrap();
        let mut solver = PushRelabelHighest::new(g, 0, 3, 1).unwrap();
        assert_eq!(solver.find_max_flow().unwrap(), 4);
    }
}
