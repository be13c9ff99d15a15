//! Exact distance labels ("global relabeling") for push-relabel algorithms.
//!
//! Labels are breadth-first distances to the sink in the residual graph. The
//! search walks edges backwards: from `v` it inspects each edge `v -> w` and asks
//! whether the mirror `w -> v` has residual capacity, which the reverse-capacity
//! cache answers without touching `w`'s adjacency list.

use std::collections::VecDeque;

use mf_core::Capacity;
use mf_graph::{CachedResidualEdge, ResidualEdge, ResidualGraph};
use rayon::prelude::*;

/// Sequential breadth-first relabel. Vertices that cannot reach the sink get `n`.
pub(crate) fn global_relabel<E: CachedResidualEdge>(
    graph: &ResidualGraph<E>,
    sink: usize,
    label: &mut [usize],
) {
    let n = graph.vertex_count();
    label.fill(n);
    label[sink] = 0;

    let mut queue = VecDeque::with_capacity(n);
    queue.push_back(sink);
    while let Some(v) = queue.pop_front() {
        let next = label[v] + 1;
        for e in graph.edges(v) {
            let w = e.dst();
            if label[w] == n && !e.reverse_residual_capacity().is_zero() {
                label[w] = next;
                queue.push_back(w);
            }
        }
    }
}

/// Frontier-parallel breadth-first relabel; same result as [`global_relabel`].
///
/// Each level's frontier is expanded in parallel against a frozen label array;
/// newly discovered vertices are then deduplicated and labelled sequentially.
pub(crate) fn parallel_global_relabel<E: CachedResidualEdge>(
    graph: &ResidualGraph<E>,
    sink: usize,
    label: &mut [usize],
) {
    let n = graph.vertex_count();
    label.fill(n);
    label[sink] = 0;

    let mut frontier = vec![sink];
    let mut depth = 0;
    while !frontier.is_empty() {
        depth += 1;
        let seen: &[usize] = label;
        let discovered: Vec<usize> = frontier
            .par_iter()
            .flat_map_iter(|&v| {
                graph.edges(v).iter().filter_map(move |e| {
                    let w = e.dst();
                    (seen[w] == n && !e.reverse_residual_capacity().is_zero()).then_some(w)
                })
            })
            .collect();

        frontier.clear();
        for w in discovered {
            if label[w] == n {
                label[w] = depth;
                frontier.push(w);
            }
        }
    }
}
