//! Preflow state shared by the push-relabel family.
//!
//! Only the first phase of push-relabel is run: once no vertex with excess has a
//! label below `n`, the excess collected at the sink equals the maximum flow value.
//! Labels at or above `n` mean "cannot reach the sink" and such vertices are never
//! discharged again.

use mf_core::{Capacity, VertexIndex};
use mf_graph::{CachedEdge, ResidualEdge, ResidualGraph};

use crate::algorithm::check_terminals;
use crate::error::{SolverError, SolverResult};
use crate::labels;

/// Vertex excess accumulator. Wider than every capacity type, so saturating many
/// source edges into one vertex cannot overflow it.
pub(crate) type Excess = u128;

#[inline]
pub(crate) fn widen<C: Capacity>(amount: C) -> Excess {
    Excess::from(amount.widen())
}

/// Largest push `excess` allows over an edge with `residual` left.
#[inline]
pub(crate) fn clamp_push<C: Capacity>(excess: Excess, residual: C) -> C {
    C::saturating_from_u128(excess).min(residual)
}

/// How global relabels are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relabel {
    Sequential,
    Parallel,
}

pub(crate) struct Preflow<V, C> {
    pub graph: ResidualGraph<CachedEdge<V, C>>,
    pub source: usize,
    pub sink: usize,
    pub label: Vec<usize>,
    pub excess: Vec<Excess>,
    /// Current-arc pointer per vertex.
    pub current: Vec<usize>,
    relabel_mode: Relabel,
    relabels_since_global: usize,
    pub global_relabels: usize,
}

impl<V: VertexIndex, C: Capacity> Preflow<V, C> {
    pub fn new(
        graph: ResidualGraph<CachedEdge<V, C>>,
        source: usize,
        sink: usize,
        relabel_mode: Relabel,
    ) -> SolverResult<Self> {
        check_terminals(&graph, source, sink)?;
        let n = graph.vertex_count();
        Ok(Self {
            graph,
            source,
            sink,
            label: vec![0; n],
            excess: vec![0; n],
            current: vec![0; n],
            relabel_mode,
            relabels_since_global: 0,
            global_relabels: 0,
        })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.label.len()
    }

    /// Compute exact labels and saturate every edge leaving the source.
    pub fn initialize(&mut self) -> SolverResult<()> {
        self.global_relabel();
        for slot in 0..self.graph.edges(self.source).len() {
            let e = *self.graph.edge(self.source, slot);
            let cap = e.residual_capacity();
            if cap.is_zero() || e.dst() == self.source {
                continue;
            }
            self.graph.push_flow(self.source, slot, cap)?;
            self.add_excess(e.dst(), cap)?;
        }
        Ok(())
    }

    /// Has excess, is not a terminal, and can still reach the sink.
    #[inline]
    pub fn is_active(&self, v: usize) -> bool {
        v != self.source
            && v != self.sink
            && self.excess[v] != 0
            && self.label[v] < self.n()
    }

    #[inline]
    pub fn is_admissible(&self, u: usize, e: &CachedEdge<V, C>) -> bool {
        !e.residual_capacity.is_zero() && self.label[u] == self.label[e.dst()] + 1
    }

    #[inline]
    fn add_excess(&mut self, v: usize, amount: C) -> SolverResult<()> {
        self.excess[v] = self.excess[v]
            .checked_add(widen(amount))
            .ok_or(SolverError::FlowOverflow {
                what: "vertex excess",
            })?;
        Ok(())
    }

    /// Push `amount` along `(u, slot)`. Returns true when the destination turned
    /// from inactive to active.
    #[inline]
    pub fn push(&mut self, u: usize, slot: usize, amount: C) -> SolverResult<bool> {
        let w = self.graph.edge(u, slot).dst();
        let was_idle = self.excess[w] == 0;
        self.graph.push_flow(u, slot, amount)?;
        self.excess[u] -= widen(amount);
        self.add_excess(w, amount)?;
        Ok(was_idle && self.is_active(w))
    }

    /// Smallest label reachable over one residual edge plus one, capped at `n`.
    pub fn min_neighbor_label(&self, u: usize) -> usize {
        let n = self.n();
        self.graph
            .edges(u)
            .iter()
            .filter(|e| !e.residual_capacity.is_zero() && e.dst() != u)
            .map(|e| self.label[e.dst()] + 1)
            .min()
            .unwrap_or(n)
            .min(n)
    }

    /// Relabel `u` and rewind its current arc. Returns the new label.
    pub fn relabel(&mut self, u: usize) -> usize {
        let label = self.min_neighbor_label(u);
        self.set_label(u, label);
        label
    }

    #[inline]
    pub fn set_label(&mut self, u: usize, label: usize) {
        debug_assert!(label >= self.label[u]);
        self.label[u] = label;
        self.current[u] = 0;
        self.relabels_since_global += 1;
    }

    /// Enough local relabels have happened that exact labels are worth recomputing.
    #[inline]
    pub fn needs_global_relabel(&self) -> bool {
        self.relabels_since_global >= self.n()
    }

    pub fn global_relabel(&mut self) {
        match self.relabel_mode {
            Relabel::Sequential => labels::global_relabel(&self.graph, self.sink, &mut self.label),
            Relabel::Parallel => {
                labels::parallel_global_relabel(&self.graph, self.sink, &mut self.label)
            }
        }
        let n = self.n();
        self.label[self.source] = n;
        self.current.fill(0);
        self.relabels_since_global = 0;
        self.global_relabels += 1;
    }

    /// All currently active vertices, in index order.
    pub fn active_vertices(&self) -> Vec<usize> {
        (0..self.n()).filter(|&v| self.is_active(v)).collect()
    }

    /// Largest residual capacity of any edge.
    pub fn max_residual(&self) -> C {
        self.graph
            .adjacency()
            .iter()
            .flatten()
            .map(|e| e.residual_capacity)
            .max()
            .unwrap_or(C::ZERO)
    }

    /// Excess collected at the sink, which must fit the capacity type.
    pub fn flow_value(&self) -> SolverResult<C> {
        let total = self.excess[self.sink];
        if total > widen(C::MAX) {
            return Err(SolverError::FlowOverflow { what: "total flow" });
        }
        Ok(C::saturating_from_u128(total))
    }
}
