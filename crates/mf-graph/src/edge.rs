//! Edge records stored in adjacency-list slots.
//!
//! Two kinds exist. [`BasicEdge`] carries only what every algorithm needs;
//! [`CachedEdge`] additionally keeps a copy of its mirror's residual capacity so
//! label-based algorithms can test reverse residuals without a second lookup.
//! Which kind a solver uses is fixed by its type, never chosen at runtime.

use mf_core::{Capacity, VertexIndex};

/// Capabilities shared by every edge kind.
pub trait ResidualEdge: Copy + core::fmt::Debug + PartialEq + Send + Sync + 'static {
    type Vertex: VertexIndex;
    type Cap: Capacity;

    /// Whether this kind stores a reverse-capacity cache that must be refreshed.
    const CACHES_REVERSE: bool;

    fn new(
        dst_vertex: Self::Vertex,
        residual_capacity: Self::Cap,
        reverse_edge_index: Self::Vertex,
    ) -> Self;

    fn dst_vertex(&self) -> Self::Vertex;

    fn residual_capacity(&self) -> Self::Cap;

    fn reverse_edge_index(&self) -> Self::Vertex;

    fn set_residual_capacity(&mut self, capacity: Self::Cap);

    fn set_reverse_edge_index(&mut self, index: Self::Vertex);

    /// Store the mirror's residual capacity. No-op for kinds without a cache.
    #[inline]
    fn refresh_reverse_capacity(&mut self, _capacity: Self::Cap) {}

    /// The cached mirror capacity, if this kind keeps one.
    #[inline]
    fn cached_reverse_capacity(&self) -> Option<Self::Cap> {
        None
    }

    #[inline]
    fn dst(&self) -> usize {
        self.dst_vertex().index()
    }

    #[inline]
    fn rev(&self) -> usize {
        self.reverse_edge_index().index()
    }
}

/// Edge kinds that always carry the mirror's residual capacity.
pub trait CachedResidualEdge: ResidualEdge {
    fn reverse_residual_capacity(&self) -> Self::Cap;
}

/// Plain residual edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicEdge<V, C> {
    pub dst_vertex: V,
    pub residual_capacity: C,
    pub reverse_edge_index: V,
}

/// Residual edge with a denormalized copy of its mirror's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CachedEdge<V, C> {
    pub dst_vertex: V,
    pub residual_capacity: C,
    pub reverse_edge_index: V,
    pub reverse_residual_capacity: C,
}

impl<V: VertexIndex, C: Capacity> ResidualEdge for BasicEdge<V, C> {
    type Vertex = V;
    type Cap = C;
    const CACHES_REVERSE: bool = false;

    #[inline]
    fn new(dst_vertex: V, residual_capacity: C, reverse_edge_index: V) -> Self {
        Self {
            dst_vertex,
            residual_capacity,
            reverse_edge_index,
        }
    }

    #[inline]
    fn dst_vertex(&self) -> V {
        self.dst_vertex
    }

    #[inline]
    fn residual_capacity(&self) -> C {
        self.residual_capacity
    }

    #[inline]
    fn reverse_edge_index(&self) -> V {
        self.reverse_edge_index
    }

    #[inline]
    fn set_residual_capacity(&mut self, capacity: C) {
        self.residual_capacity = capacity;
    }

    #[inline]
    fn set_reverse_edge_index(&mut self, index: V) {
        self.reverse_edge_index = index;
    }
}

impl<V: VertexIndex, C: Capacity> ResidualEdge for CachedEdge<V, C> {
    type Vertex = V;
    type Cap = C;
    const CACHES_REVERSE: bool = true;

    #[inline]
    fn new(dst_vertex: V, residual_capacity: C, reverse_edge_index: V) -> Self {
        Self {
            dst_vertex,
            residual_capacity,
            reverse_edge_index,
            reverse_residual_capacity: C::ZERO,
        }
    }

    #[inline]
    fn dst_vertex(&self) -> V {
        self.dst_vertex
    }

    #[inline]
    fn residual_capacity(&self) -> C {
        self.residual_capacity
    }

    #[inline]
    fn reverse_edge_index(&self) -> V {
        self.reverse_edge_index
    }

    #[inline]
    fn set_residual_capacity(&mut self, capacity: C) {
        self.residual_capacity = capacity;
    }

    #[inline]
    fn set_reverse_edge_index(&mut self, index: V) {
        self.reverse_edge_index = index;
    }

    #[inline]
    fn refresh_reverse_capacity(&mut self, capacity: C) {
        self.reverse_residual_capacity = capacity;
    }

    #[inline]
    fn cached_reverse_capacity(&self) -> Option<C> {
        Some(self.reverse_residual_capacity)
    }
}

impl<V: VertexIndex, C: Capacity> CachedResidualEdge for CachedEdge<V, C> {
    #[inline]
    fn reverse_residual_capacity(&self) -> C {
        self.reverse_residual_capacity
    }
}
