//! Residual graph validation.

use mf_core::VertexIndex;

use crate::edge::ResidualEdge;
use crate::error::{GraphError, GraphResult};
use crate::graph::ResidualGraph;

/// Check that every edge's mirror exists and points back at it.
pub fn validate_linkage<E: ResidualEdge>(graph: &ResidualGraph<E>) -> GraphResult<()> {
    let adjacency = graph.adjacency();
    let n = adjacency.len();

    for (u, edges) in adjacency.iter().enumerate() {
        for (slot, e) in edges.iter().enumerate() {
            let broken = GraphError::BrokenLinkage { vertex: u, slot };
            let v = e.dst();
            if v >= n {
                return Err(broken);
            }
            let Some(mirror) = adjacency[v].get(e.rev()) else {
                return Err(broken);
            };
            if mirror.dst() != u || mirror.reverse_edge_index().index() != slot {
                return Err(broken);
            }
        }
    }

    Ok(())
}

/// Check that every cached reverse capacity equals its mirror's residual capacity.
///
/// Always succeeds for edge kinds without a cache. Assumes linkage is valid.
pub fn validate_reverse_cache<E: ResidualEdge>(graph: &ResidualGraph<E>) -> GraphResult<()> {
    for (u, edges) in graph.adjacency().iter().enumerate() {
        for (slot, e) in edges.iter().enumerate() {
            if let Some(cached) = e.cached_reverse_capacity()
                && cached != graph.mirror(u, slot).residual_capacity()
            {
                return Err(GraphError::StaleReverseCache { vertex: u, slot });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{BasicEdge, CachedEdge};

    type E = BasicEdge<u32, u32>;

    #[test]
    fn validate_empty_graph() {
        let g = ResidualGraph::<E> { adjacency: vec![] };
        assert!(validate_linkage(&g).is_ok());
    }

    #[test]
    fn validate_rejects_dangling_destination() {
        let g = ResidualGraph::<E> {
            adjacency: vec![vec![E::new(7, 1, 0)]],
        };
        assert_eq!(
            validate_linkage(&g),
            Err(GraphError::BrokenLinkage { vertex: 0, slot: 0 })
        );
    }

    #[test]
    fn validate_rejects_one_sided_link() {
        // 0 -> 1 points at slot 0 of vertex 1, but that edge points at slot 1 of vertex 0.
        let g = ResidualGraph::<E> {
            adjacency: vec![vec![E::new(1, 1, 0)], vec![E::new(0, 0, 1)]],
        };
        assert!(validate_linkage(&g).is_err());
    }

    #[test]
    fn validate_detects_stale_cache() {
        let mut g = ResidualGraph::<CachedEdge<u32, u32>> {
            adjacency: vec![
                vec![CachedEdge::new(1, 4, 0)],
                vec![CachedEdge::new(0, 1, 0)],
            ],
        };
        assert!(validate_reverse_cache(&g).is_err());
        g.refresh_reverse_cache();
        assert!(validate_reverse_cache(&g).is_ok());
    }
}
