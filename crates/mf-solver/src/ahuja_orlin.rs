//! Ahuja-Orlin excess scaling.
//!
//! Works in phases over a power-of-two scale `delta`. Within a phase only vertices
//! holding more than `delta / 2` excess are discharged, lowest label first, and no
//! push may lift a non-sink destination above `delta`. The scale halves until it
//! reaches zero, at which point every active vertex has been drained.

use mf_core::{Capacity, VertexIndex};
use mf_graph::{CachedEdge, ResidualEdge, ResidualGraph};
use tracing::{debug, trace};

use crate::algorithm::MaxFlowAlgorithm;
use crate::error::SolverResult;
use crate::preflow::{Excess, Preflow, Relabel, clamp_push, widen};

pub struct AhujaOrlin<V, C> {
    state: Preflow<V, C>,
    delta: C,
    /// Large-excess vertices bucketed by label.
    buckets: Vec<Vec<usize>>,
    bucketed: Vec<bool>,
    lowest: usize,
}

/// Amount to push from `u` over an edge with `residual` towards a vertex currently
/// holding `dst_excess`. The scale limit never applies to the sink. A limit that
/// would stall the push falls back to the unrestricted amount.
pub(crate) fn scaled_amount<C: Capacity>(
    excess: Excess,
    residual: C,
    dst_excess: Excess,
    delta: C,
    dst_is_sink: bool,
) -> C {
    let unrestricted = clamp_push(excess, residual);
    if dst_is_sink {
        return unrestricted;
    }
    let room = widen(delta).saturating_sub(dst_excess);
    let limited = clamp_push(room, unrestricted);
    if limited.is_zero() {
        unrestricted
    } else {
        limited
    }
}

impl<V: VertexIndex, C: Capacity> AhujaOrlin<V, C> {
    fn is_large(&self, v: usize) -> bool {
        self.state.is_active(v) && self.state.excess[v] > widen(self.delta.halve())
    }

    fn insert(&mut self, v: usize) {
        if self.bucketed[v] || !self.is_large(v) {
            return;
        }
        let label = self.state.label[v];
        self.bucketed[v] = true;
        self.buckets[label].push(v);
        self.lowest = self.lowest.min(label);
    }

    fn rebuild(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.bucketed.fill(false);
        self.lowest = self.state.n();
        for v in self.state.active_vertices() {
            self.insert(v);
        }
    }

    fn pop_lowest(&mut self) -> Option<usize> {
        while self.lowest < self.buckets.len() {
            if let Some(v) = self.buckets[self.lowest].pop() {
                self.bucketed[v] = false;
                return Some(v);
            }
            self.lowest += 1;
        }
        None
    }

    /// Push from `u` while it holds large excess. A relabel ends the visit and
    /// puts `u` back in line under its new label.
    fn process(&mut self, u: usize) -> SolverResult<()> {
        while self.is_large(u) {
            let slot = self.state.current[u];
            if slot == self.state.graph.edges(u).len() {
                self.state.relabel(u);
                self.insert(u);
                return Ok(());
            }
            let e = *self.state.graph.edge(u, slot);
            if !self.state.is_admissible(u, &e) {
                self.state.current[u] += 1;
                continue;
            }
            let w = e.dst();
            let amount = scaled_amount(
                self.state.excess[u],
                e.residual_capacity(),
                self.state.excess[w],
                self.delta,
                w == self.state.sink,
            );
            self.state.push(u, slot, amount)?;
            self.insert(w);
        }
        Ok(())
    }
}

impl<V: VertexIndex, C: Capacity> MaxFlowAlgorithm for AhujaOrlin<V, C> {
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
            delta: C::ZERO,
            buckets: vec![Vec::new(); n],
            bucketed: vec![false; n],
            lowest: n,
        })
    }

    fn find_max_flow(&mut self) -> SolverResult<C> {
        self.state.initialize()?;
        self.delta = self.state.max_residual().power_of_two_ceiling();

        let mut phases = 0_usize;
        while !self.delta.is_zero() {
            trace!(delta = %self.delta, "scaling phase");
            self.rebuild();
            while let Some(u) = self.pop_lowest() {
                self.process(u)?;
                if self.state.needs_global_relabel() {
                    self.state.global_relabel();
                    self.rebuild();
                }
            }
            self.delta = self.delta.halve();
            phases += 1;
        }

        let flow = self.state.flow_value()?;
        debug!(
            phases,
            global_relabels = self.state.global_relabels,
            %flow,
            "ahuja-orlin finished"
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
    use mf_graph::{MergeRule, load_sparse};

    #[test]
    fn scaled_amount_respects_destination_room() {
        assert_eq!(scaled_amount::<u32>(10, 10, 6, 8, false), 2);
        assert_eq!(scaled_amount::<u32>(10, 10, 6, 8, true), 10);
        // No room left: fall back to the plain amount.
        assert_eq!(scaled_amount::<u32>(3, 10, 8, 8, false), 3);
        // Excess beyond the capacity type is clamped to the edge.
        let huge = 3 * u128::from(u32::MAX);
        assert_eq!(scaled_amount::<u32>(huge, 7, 0, 8, false), 7);
    }

    #[test]
    fn classic_six_vertex_network() {
        let rows = [0, 0, 1, 1, 2, 3, 4, 4];
        let cols = [1, 2, 3, 4, 4, 5, 3, 5];
        let caps = [10, 10, 4, 8, 9, 10, 6, 10];
        let g = load_sparse::<CachedEdge<u32, u64>>(&rows, &cols, &caps, 6, MergeRule::OppositeOnly)
            .unwrap();
        let mut solver = AhujaOrlin::new(g, 0, 5, 1).unwrap();
        assert_eq!(solver.find_max_flow().unwrap(), 19);
    }

    #[test]
    fn large_capacities_near_the_width_limit() {
        let big = u32::MAX / 2;
        let g = load_sparse::<CachedEdge<u32, u32>>(
            &[0, 1, 1],
            &[1, 2, 2],
            &[big, big / 3, big / 5],
            3,
            MergeRule::SumParallel,
        )
        .unwrap();
        let mut solver = AhujaOrlin::new(g, 0, 2, 1).unwrap();
        assert_eq!(solver.find_max_flow().unwrap(), big / 3 + big / 5);
    }
}
