//! Residual graph storage.

use mf_core::Capacity;

use crate::edge::ResidualEdge;
use crate::error::{GraphError, GraphResult};
use crate::validate;

/// Adjacency-list residual graph.
///
/// Vertex `u` owns `adjacency[u]`, an insertion-ordered list of edges. Every edge
/// names its mirror by `(dst_vertex, reverse_edge_index)`, so following an edge to
/// its counterpart is two array lookups and never a pointer chase.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualGraph<E> {
    pub(crate) adjacency: Vec<Vec<E>>,
}

impl<E: ResidualEdge> ResidualGraph<E> {
    /// Wrap hand-built adjacency lists, rejecting any that break mutual linkage.
    pub fn from_adjacency(adjacency: Vec<Vec<E>>) -> GraphResult<Self> {
        let graph = Self { adjacency };
        validate::validate_linkage(&graph)?;
        Ok(graph)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of directed residual edges (twice the number of pairs).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Outgoing edges of `u`.
    #[inline]
    pub fn edges(&self, u: usize) -> &[E] {
        &self.adjacency[u]
    }

    #[inline]
    pub fn edge(&self, u: usize, slot: usize) -> &E {
        &self.adjacency[u][slot]
    }

    /// The mirror of the edge at `(u, slot)`.
    #[inline]
    pub fn mirror(&self, u: usize, slot: usize) -> &E {
        let e = &self.adjacency[u][slot];
        &self.adjacency[e.dst()][e.rev()]
    }

    /// Residual capacity of the mirror of `(u, slot)`, read from the cache when the
    /// edge kind keeps one.
    #[inline]
    pub fn reverse_capacity(&self, u: usize, slot: usize) -> E::Cap {
        let e = &self.adjacency[u][slot];
        match e.cached_reverse_capacity() {
            Some(cap) => cap,
            None => self.adjacency[e.dst()][e.rev()].residual_capacity(),
        }
    }

    pub fn adjacency(&self) -> &[Vec<E>] {
        &self.adjacency
    }

    pub fn into_adjacency(self) -> Vec<Vec<E>> {
        self.adjacency
    }

    /// Move `amount` units of flow across `(u, slot)`.
    ///
    /// Decreases the edge's residual, increases its mirror's, and keeps both cached
    /// copies in step. `amount` must not exceed the edge's residual capacity.
    #[inline]
    pub fn push_flow(&mut self, u: usize, slot: usize, amount: E::Cap) -> GraphResult<()> {
        let e = self.adjacency[u][slot];
        debug_assert!(amount <= e.residual_capacity());
        let (v, k) = (e.dst(), e.rev());

        let backward = self.adjacency[v][k]
            .residual_capacity()
            .checked_add(amount)
            .ok_or(GraphError::CapacityOverflow {
                src: v as u64,
                dst: u as u64,
            })?;
        let forward = e.residual_capacity() - amount;

        self.adjacency[u][slot].set_residual_capacity(forward);
        let mirror = &mut self.adjacency[v][k];
        mirror.set_residual_capacity(backward);

        if E::CACHES_REVERSE {
            mirror.refresh_reverse_capacity(forward);
            self.adjacency[u][slot].refresh_reverse_capacity(backward);
        }
        Ok(())
    }

    /// Re-snapshot every edge's mirror capacity into its cache.
    ///
    /// Does nothing for edge kinds without a cache.
    pub fn refresh_reverse_cache(&mut self) {
        if !E::CACHES_REVERSE {
            return;
        }
        for u in 0..self.adjacency.len() {
            for slot in 0..self.adjacency[u].len() {
                let e = self.adjacency[u][slot];
                let cap = self.adjacency[e.dst()][e.rev()].residual_capacity();
                self.adjacency[u][slot].refresh_reverse_capacity(cap);
            }
        }
    }

    /// Copy this graph into another edge kind of the same widths.
    ///
    /// Slots and reverse indices are preserved; a target kind with a cache gets it
    /// filled from the copied residuals.
    pub fn to_edge_kind<F>(&self) -> ResidualGraph<F>
    where
        F: ResidualEdge<Vertex = E::Vertex, Cap = E::Cap>,
    {
        let adjacency = self
            .adjacency
            .iter()
            .map(|edges| {
                edges
                    .iter()
                    .map(|e| F::new(e.dst_vertex(), e.residual_capacity(), e.reverse_edge_index()))
                    .collect()
            })
            .collect();
        let mut graph = ResidualGraph { adjacency };
        graph.refresh_reverse_cache();
        graph
    }

    /// Sum of residual capacities leaving `u`.
    pub fn out_capacity(&self, u: usize) -> Option<E::Cap> {
        self.adjacency[u]
            .iter()
            .try_fold(E::Cap::ZERO, |acc, e| acc.checked_add(e.residual_capacity()))
    }
}
