//! Edmonds-Karp: shortest augmenting paths found by breadth-first search.

use std::collections::VecDeque;

use mf_core::{Capacity, VertexIndex};
use mf_graph::{BasicEdge, ResidualEdge, ResidualGraph};
use tracing::debug;

use crate::algorithm::{MaxFlowAlgorithm, check_terminals};
use crate::error::{SolverError, SolverResult};

const NO_PARENT: (usize, usize) = (usize::MAX, usize::MAX);

pub struct EdmondsKarp<V, C> {
    graph: ResidualGraph<BasicEdge<V, C>>,
    source: usize,
    sink: usize,
    /// `(vertex, slot)` of the edge that discovered each vertex.
    parent: Vec<(usize, usize)>,
    queue: VecDeque<usize>,
}

impl<V: VertexIndex, C: Capacity> EdmondsKarp<V, C> {
    /// Breadth-first search from the source; true if the sink was reached.
    fn find_path(&mut self) -> bool {
        self.parent.fill(NO_PARENT);
        self.queue.clear();
        self.parent[self.source] = (self.source, 0);
        self.queue.push_back(self.source);

        while let Some(u) = self.queue.pop_front() {
            for (slot, e) in self.graph.edges(u).iter().enumerate() {
                let v = e.dst();
                if e.residual_capacity().is_zero() || self.parent[v] != NO_PARENT {
                    continue;
                }
                self.parent[v] = (u, slot);
                if v == self.sink {
                    return true;
                }
                self.queue.push_back(v);
            }
        }
        false
    }

    fn augment(&mut self) -> SolverResult<C> {
        let mut bottleneck = C::MAX;
        let mut v = self.sink;
        while v != self.source {
            let (u, slot) = self.parent[v];
            bottleneck = bottleneck.min(self.graph.edge(u, slot).residual_capacity());
            v = u;
        }

        let mut v = self.sink;
        while v != self.source {
            let (u, slot) = self.parent[v];
            self.graph.push_flow(u, slot, bottleneck)?;
            v = u;
        }
        Ok(bottleneck)
    }
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for EdmondsKarp<V, C> {
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
            parent: vec![NO_PARENT; n],
            queue: VecDeque::with_capacity(n),
        })
    }

    fn find_max_flow(&mut self) -> SolverResult<C> {
        let mut flow = C::ZERO;
        let mut paths = 0_usize;
        while self.find_path() {
            let pushed = self.augment()?;
            flow = flow
                .checked_add(pushed)
                .ok_or(SolverError::FlowOverflow { what: "total flow" })?;
            paths += 1;
        }
        debug!(paths, %flow, "edmonds-karp finished");
        Ok(flow)
    }

    fn graph(&self) -> &ResidualGraph<Self::Edge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_graph::load_dense;

    #[test]
    fn single_path_bottleneck() {
        #[rustfmt::skip]
        let data = [
            0, 5, 0,
            0, 0, 3,
            0, 0, 0,
        ];
        let g = load_dense::<BasicEdge<u32, u32>>(&data, 3).unwrap();
        let mut ek = EdmondsKarp::new(g, 0, 2, 1).unwrap();
        assert_eq!(ek.find_max_flow().unwrap(), 3);
        // 0 -> 1 keeps 2 units of residual capacity.
        assert_eq!(ek.graph().edge(0, 0).residual_capacity, 2);
    }

    #[test]
    fn rejects_equal_terminals() {
        let g = load_dense::<BasicEdge<u32, u32>>(&[0, 1, 0, 0], 2).unwrap();
        assert!(matches!(
            EdmondsKarp::new(g, 1, 1, 1),
            Err(SolverError::ProblemSetup { .. })
        ));
    }

    #[test]
    fn total_flow_overflow_is_reported() {
        // Two disjoint paths of u32::MAX each.
        let big = u32::MAX;
        #[rustfmt::skip]
        let data = [
            0, big, big, 0,
            0, 0,   0,   big,
            0, 0,   0,   big,
            0, 0,   0,   0,
        ];
        let g = load_dense::<BasicEdge<u32, u32>>(&data, 4).unwrap();
        let mut ek = EdmondsKarp::new(g, 0, 3, 1).unwrap();
        assert!(matches!(
            ek.find_max_flow(),
            Err(SolverError::FlowOverflow { .. })
        ));
    }
}
