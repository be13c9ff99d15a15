//! Dinic: blocking flows on BFS level graphs.

use std::collections::VecDeque;

use mf_core::{Capacity, VertexIndex};
use mf_graph::{BasicEdge, ResidualEdge, ResidualGraph};
use tracing::debug;

use crate::algorithm::{MaxFlowAlgorithm, check_terminals};
use crate::error::{SolverError, SolverResult};

const UNREACHED: usize = usize::MAX;

pub struct Dinic<V, C> {
    graph: ResidualGraph<BasicEdge<V, C>>,
    source: usize,
    sink: usize,
    level: Vec<usize>,
    /// Current-arc pointer per vertex.
    next_slot: Vec<usize>,
    queue: VecDeque<usize>,
    path: Vec<(usize, usize)>,
}

impl<V: VertexIndex, C: Capacity> Dinic<V, C> {
    fn build_levels(&mut self) -> bool {
        self.level.fill(UNREACHED);
        self.queue.clear();
        self.level[self.source] = 0;
        self.queue.push_back(self.source);

        while let Some(u) = self.queue.pop_front() {
            for e in self.graph.edges(u) {
                let v = e.dst();
                if !e.residual_capacity().is_zero() && self.level[v] == UNREACHED {
                    self.level[v] = self.level[u] + 1;
                    self.queue.push_back(v);
                }
            }
        }
        self.level[self.sink] != UNREACHED
    }

    /// Find one source-sink path in the level graph and saturate its bottleneck.
    ///
    /// Dead ends are pruned from the level graph as the search retreats, so each
    /// phase touches every edge a bounded number of times.
    fn augment(&mut self) -> SolverResult<Option<C>> {
        self.path.clear();
        let mut u = self.source;

        loop {
            if u == self.sink {
                let mut bottleneck = C::MAX;
                for &(v, slot) in &self.path {
                    bottleneck = bottleneck.min(self.graph.edge(v, slot).residual_capacity());
                }
                for &(v, slot) in &self.path {
                    self.graph.push_flow(v, slot, bottleneck)?;
                }
                return Ok(Some(bottleneck));
            }

            let edges = self.graph.edges(u);
            let mut advanced = false;
            while self.next_slot[u] < edges.len() {
                let slot = self.next_slot[u];
                let e = &edges[slot];
                let v = e.dst();
                if !e.residual_capacity().is_zero()
                    && self.level[v] != UNREACHED
                    && self.level[v] == self.level[u] + 1
                {
                    self.path.push((u, slot));
                    u = v;
                    advanced = true;
                    break;
                }
                self.next_slot[u] += 1;
            }

            if !advanced {
                self.level[u] = UNREACHED;
                match self.path.pop() {
                    Some((prev, slot)) => {
                        debug_assert_eq!(self.next_slot[prev], slot);
                        self.next_slot[prev] += 1;
                        u = prev;
                    }
                    None => return Ok(None),
                }
            }
        }
    }
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for Dinic<V, C> {
    type Edge = BasicEdge<V, C>;

    fn new(
        graph: ResidualGraph<Self::Edge>,
        source: usize,
        sink: usize,
        _threads: usize,
    ) -> SolverResult<Self> {
        check_terminals(&graph, source, sink)?;
        let n = graph.vertex_count();
        Ok(Self {
            graph,
            source,
            sink,
            level: vec![UNREACHED; n],
            next_slot: vec![0; n],
            queue: VecDeque::with_capacity(n),
            path: Vec::new(),
        })
    }

    fn find_max_flow(&mut self) -> SolverResult<C> {
        let mut flow = C::ZERO;
        let mut phases = 0_usize;
        while self.build_levels() {
            self.next_slot.fill(0);
            while let Some(pushed) = self.augment()? {
                flow = flow
                    .checked_add(pushed)
                    .ok_or(SolverError::FlowOverflow { what: "total flow" })?;
            }
            phases += 1;
        }
        debug!(phases, %flow, "dinic finished");
        Ok(flow)
    }

    fn graph(&self) -> &ResidualGraph<Self::Edge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_graph::{MergeRule, load_sparse};

    #[test]
    fn classic_six_vertex_network() {
        let rows = [0, 0, 1, 1, 2, 3, 4, 4];
        let cols = [1, 2, 3, 4, 4, 5, 3, 5];
        let caps = [10, 10, 4, 8, 9, 10, 6, 10];
        let g = load_sparse::<BasicEdge<u32, u64>>(&rows, &cols, &caps, 6, MergeRule::OppositeOnly)
            .unwrap();
        let mut dinic = Dinic::new(g, 0, 5, 1).unwrap();
        assert_eq!(dinic.find_max_flow().unwrap(), 19);
    }

    #[test]
    fn disconnected_sink() {
        let g = load_sparse::<BasicEdge<u32, u32>>(&[0, 2], &[1, 3], &[10, 5], 4, MergeRule::OppositeOnly)
            .unwrap();
        let mut dinic = Dinic::new(g, 0, 3, 1).unwrap();
        assert_eq!(dinic.find_max_flow().unwrap(), 0);
    }
}
