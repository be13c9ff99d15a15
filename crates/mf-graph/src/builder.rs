//! Residual graph assembler.

use std::marker::PhantomData;

use mf_core::VertexIndex;
use tracing::{debug, instrument};

use crate::dense::read_dense;
use crate::edge::ResidualEdge;
use crate::edge_list::EdgeList;
use crate::error::GraphResult;
use crate::graph::ResidualGraph;
use crate::input::{DenseCapacities, SparseTriplets};
use crate::sparse::{MergeRule, read_sparse};
use crate::validate;

/// Builder turning a flat edge-pair list into a [`ResidualGraph`].
///
/// Create it from a reader (`from_dense`, `from_sparse`) or from an existing
/// [`EdgeList`], then call `build()` to assemble, fill the reverse-capacity cache
/// (for cached edge kinds) and validate linkage.
#[derive(Debug, Clone)]
pub struct GraphBuilder<E: ResidualEdge> {
    list: EdgeList<E::Vertex, E::Cap>,
    _edge: PhantomData<E>,
}

impl<E: ResidualEdge> GraphBuilder<E> {
    pub fn from_edge_list(list: EdgeList<E::Vertex, E::Cap>) -> Self {
        Self {
            list,
            _edge: PhantomData,
        }
    }

    /// Read a dense capacity matrix.
    pub fn from_dense(matrix: &DenseCapacities<'_, E::Cap>) -> GraphResult<Self> {
        Ok(Self::from_edge_list(read_dense(matrix)?))
    }

    /// Read sparse triplets with the given merge rule.
    pub fn from_sparse(
        triplets: &SparseTriplets<'_, E::Vertex, E::Cap>,
        rule: MergeRule,
    ) -> GraphResult<Self> {
        Ok(Self::from_edge_list(read_sparse(triplets, rule)?))
    }

    pub fn edge_list(&self) -> &EdgeList<E::Vertex, E::Cap> {
        &self.list
    }

    /// Assemble, refresh the reverse-capacity cache, and validate.
    #[instrument(level = "debug", skip(self), fields(pairs = self.list.pair_count()))]
    pub fn build(self) -> GraphResult<ResidualGraph<E>> {
        let mut graph = assemble(&self.list)?;
        graph.refresh_reverse_cache();
        validate::validate_linkage(&graph)?;
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            cached = E::CACHES_REVERSE,
            "assembled residual graph"
        );
        Ok(graph)
    }
}

/// Two-phase, index-only assembly.
///
/// Phase 1 places every forward edge on its source's list, parking the flat index
/// of its mirror in `reverse_edge_index`. Phase 2 walks only the edges that existed
/// before it started, appends each mirror to the destination's list, and rewrites
/// both reverse indices to final adjacency slots.
fn assemble<E: ResidualEdge>(list: &EdgeList<E::Vertex, E::Cap>) -> GraphResult<ResidualGraph<E>> {
    let pairs = list.pairs();
    let mut adjacency: Vec<Vec<E>> = list
        .outgoing_counts()
        .iter()
        .map(|&count| Vec::with_capacity(count))
        .collect();

    // Phase 1: forward placement.
    for (flat, pair) in pairs.chunks_exact(2).enumerate() {
        let (edge, mirror) = (pair[0], pair[1]);
        let mirror_flat = E::Vertex::from_usize(2 * flat + 1)?;
        adjacency[mirror.dst_vertex.index()].push(E::new(
            edge.dst_vertex,
            edge.capacity,
            mirror_flat,
        ));
    }

    let forward_counts: Vec<usize> = adjacency.iter().map(Vec::len).collect();

    // Phase 2: mirror placement and index resolution.
    for u in 0..adjacency.len() {
        let src = E::Vertex::from_usize(u)?;
        for k in 0..forward_counts[u] {
            let e = adjacency[u][k];
            let mirror = pairs[e.rev()];
            let v = e.dst();
            let landing = E::Vertex::from_usize(adjacency[v].len())?;
            adjacency[u][k].set_reverse_edge_index(landing);
            adjacency[v].push(E::new(src, mirror.capacity, E::Vertex::from_usize(k)?));
        }
    }

    Ok(ResidualGraph { adjacency })
}

/// Load a dense capacity matrix straight into a residual graph.
pub fn load_dense<E: ResidualEdge>(data: &[E::Cap], n: usize) -> GraphResult<ResidualGraph<E>> {
    let matrix = DenseCapacities::new(data, n)?;
    GraphBuilder::from_dense(&matrix)?.build()
}

/// Load sparse triplets straight into a residual graph.
pub fn load_sparse<E: ResidualEdge>(
    rows: &[E::Vertex],
    cols: &[E::Vertex],
    capacities: &[E::Cap],
    n: usize,
    rule: MergeRule,
) -> GraphResult<ResidualGraph<E>> {
    let triplets = SparseTriplets::new(rows, cols, capacities, n)?;
    GraphBuilder::from_sparse(&triplets, rule)?.build()
}
