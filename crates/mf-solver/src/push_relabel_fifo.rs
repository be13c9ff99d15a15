//! Push-relabel with a first-in first-out queue of active vertices.

use std::collections::VecDeque;

use mf_core::{Capacity, VertexIndex};
use mf_graph::{CachedEdge, ResidualEdge, ResidualGraph};
use tracing::debug;

use crate::algorithm::MaxFlowAlgorithm;
use crate::error::SolverResult;
use crate::preflow::{Preflow, Relabel, clamp_push};

pub struct PushRelabelFifo<V, C> {
    state: Preflow<V, C>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl<V: VertexIndex, C: Capacity> PushRelabelFifo<V, C> {
    fn enqueue(&mut self, v: usize) {
        if !self.queued[v] {
            self.queued[v] = true;
            self.queue.push_back(v);
        }
    }

    fn requeue_all(&mut self) {
        self.queue.clear();
        self.queued.fill(false);
        for v in self.state.active_vertices() {
            self.enqueue(v);
        }
    }

    /// Push from `u` until its excess is gone or it can no longer reach the sink.
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
                    self.enqueue(e.dst());
                }
            } else {
                self.state.current[u] += 1;
            }
        }
        Ok(())
    }
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for PushRelabelFifo<V, C> {
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
            queue: VecDeque::with_capacity(n),
            queued: vec![false; n],
        })
    }

    fn find_max_flow(&mut self) -> SolverResult<C> {
        self.state.initialize()?;
        self.requeue_all();

        let mut discharges = 0_usize;
        while let Some(u) = self.queue.pop_front() {
            self.queued[u] = false;
            self.discharge(u)?;
            discharges += 1;
            if self.state.needs_global_relabel() {
                self.state.global_relabel();
                self.requeue_all();
            }
        }

        let flow = self.state.flow_value()?;
        debug!(
            discharges,
            global_relabels = self.state.global_relabels,
            %flow,
            "fifo push-relabel finished"
        );
        Ok(flow)
    }

    fn graph(&self) -> &ResidualGraph<Self::Edge> {
        &self.state.graph
    }
}
