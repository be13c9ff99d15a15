//! Flat edge-pair list produced by the capacity readers.

use mf_core::{Capacity, VertexIndex};

/// One half of a flat edge pair: a destination and its pending residual capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEdge<V, C> {
    pub dst_vertex: V,
    pub capacity: C,
}

/// Matched edge pairs awaiting assembly.
///
/// Pair `p` occupies `pairs[2p]` (forward edge) and `pairs[2p + 1]` (its mirror).
/// The forward edge's source is the mirror's destination and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeList<V, C> {
    pub(crate) pairs: Vec<PendingEdge<V, C>>,
    pub(crate) outgoing_counts: Vec<usize>,
}

impl<V: VertexIndex, C: Capacity> EdgeList<V, C> {
    pub(crate) fn with_capacity(n: usize, pair_hint: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(2 * pair_hint),
            outgoing_counts: vec![0; n],
        }
    }

    /// Append a pair `src → dst` (capacity `forward`) and `dst → src` (capacity
    /// `backward`), returning the flat index of its forward half.
    pub(crate) fn push_pair(
        &mut self,
        src: V,
        dst: V,
        forward: C,
        backward: C,
    ) -> usize {
        let flat = self.pairs.len();
        self.pairs.push(PendingEdge {
            dst_vertex: dst,
            capacity: forward,
        });
        self.pairs.push(PendingEdge {
            dst_vertex: src,
            capacity: backward,
        });
        self.outgoing_counts[src.index()] += 1;
        self.outgoing_counts[dst.index()] += 1;
        flat
    }

    pub fn vertex_count(&self) -> usize {
        self.outgoing_counts.len()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len() / 2
    }

    /// Flat pair list; even indices forward, odd indices mirror.
    pub fn pairs(&self) -> &[PendingEdge<V, C>] {
        &self.pairs
    }

    /// Number of residual edges each vertex will own after assembly.
    pub fn outgoing_counts(&self) -> &[usize] {
        &self.outgoing_counts
    }

    /// Pair `p` as `(src, dst, forward capacity, mirror capacity)`.
    pub fn pair(&self, p: usize) -> (V, V, C, C) {
        let fwd = self.pairs[2 * p];
        let back = self.pairs[2 * p + 1];
        (back.dst_vertex, fwd.dst_vertex, fwd.capacity, back.capacity)
    }
}
