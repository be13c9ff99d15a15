//! Sparse capacity reader.

use std::collections::HashMap;

use mf_core::{Capacity, VertexIndex};
use tracing::debug;

use crate::edge_list::EdgeList;
use crate::error::{GraphError, GraphResult};
use crate::input::SparseTriplets;

/// How repeated vertex pairs in sparse input are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MergeRule {
    /// Only an opposite-direction entry merges into an existing pair (its capacity
    /// lands in the pair's mirror slot). Same-direction duplicates become separate,
    /// parallel pairs.
    #[default]
    OppositeOnly,
    /// As `OppositeOnly`, and same-direction duplicates add into the forward slot
    /// of the first pair seen for that direction.
    SumParallel,
}

/// Turn `(row, col, capacity)` triplets into a flat edge-pair list.
///
/// Triplets are processed in input order. Vertex indices are checked against `n`
/// during the pass; merged capacities are checked for overflow.
pub fn read_sparse<V: VertexIndex, C: Capacity>(
    triplets: &SparseTriplets<'_, V, C>,
    rule: MergeRule,
) -> GraphResult<EdgeList<V, C>> {
    let n = triplets.vertex_count();
    let m = triplets.len();
    let pair_hint = match n.checked_mul(n) {
        Some(cells) => m.min(cells / 2 + 1),
        None => m,
    };

    let mut list = EdgeList::with_capacity(n, pair_hint);
    // pair_index[src][dst] = flat index of the pair whose forward edge is src -> dst
    let mut pair_index: Vec<HashMap<usize, usize>> = vec![HashMap::new(); n];

    for (position, (row, col, cap)) in triplets.iter().enumerate() {
        let src = checked_vertex("row", position, row, n)?;
        let dst = checked_vertex("col", position, col, n)?;

        if let Some(&flat) = pair_index[dst].get(&src) {
            merge_into(&mut list, flat + 1, cap, src, dst)?;
            continue;
        }

        if rule == MergeRule::SumParallel
            && let Some(&flat) = pair_index[src].get(&dst)
        {
            merge_into(&mut list, flat, cap, src, dst)?;
            continue;
        }

        let flat = list.push_pair(row, col, cap, C::ZERO);
        pair_index[src].entry(dst).or_insert(flat);
    }

    debug!(n, m, pairs = list.pair_count(), ?rule, "read sparse triplets");
    Ok(list)
}

fn checked_vertex<V: VertexIndex>(
    what: &'static str,
    position: usize,
    v: V,
    n: usize,
) -> GraphResult<usize> {
    let index = v.index();
    if index >= n {
        return Err(GraphError::IndexOutOfRange {
            what,
            position,
            index: index as u64,
            n,
        });
    }
    Ok(index)
}

fn merge_into<V: VertexIndex, C: Capacity>(
    list: &mut EdgeList<V, C>,
    slot: usize,
    cap: C,
    src: usize,
    dst: usize,
) -> GraphResult<()> {
    let pending = &mut list.pairs[slot];
    pending.capacity = pending
        .capacity
        .checked_add(cap)
        .ok_or(GraphError::CapacityOverflow {
            src: src as u64,
            dst: dst as u64,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(
        rows: &[u32],
        cols: &[u32],
        caps: &[u32],
        n: usize,
        rule: MergeRule,
    ) -> GraphResult<EdgeList<u32, u32>> {
        read_sparse(&SparseTriplets::new(rows, cols, caps, n)?, rule)
    }

    #[test]
    fn opposite_direction_merges_into_mirror() {
        let list = read(&[0, 1], &[1, 0], &[3, 4], 2, MergeRule::OppositeOnly).unwrap();
        assert_eq!(list.pair_count(), 1);
        assert_eq!(list.pair(0), (0, 1, 3, 4));
    }

    #[test]
    fn same_direction_duplicates_stay_separate() {
        let list = read(&[0, 0], &[1, 1], &[3, 4], 2, MergeRule::OppositeOnly).unwrap();
        assert_eq!(list.pair_count(), 2);
        assert_eq!(list.pair(0), (0, 1, 3, 0));
        assert_eq!(list.pair(1), (0, 1, 4, 0));
        assert_eq!(list.outgoing_counts(), &[2, 2]);
    }

    #[test]
    fn duplicate_then_opposite_merges_into_first_pair() {
        let list = read(&[0, 0, 1], &[1, 1, 0], &[3, 4, 6], 2, MergeRule::OppositeOnly).unwrap();
        assert_eq!(list.pair_count(), 2);
        assert_eq!(list.pair(0), (0, 1, 3, 6));
        assert_eq!(list.pair(1), (0, 1, 4, 0));
    }

    #[test]
    fn sum_parallel_folds_same_direction() {
        let list = read(&[0, 0, 1], &[1, 1, 0], &[3, 4, 6], 2, MergeRule::SumParallel).unwrap();
        assert_eq!(list.pair_count(), 1);
        assert_eq!(list.pair(0), (0, 1, 7, 6));
    }

    #[test]
    fn out_of_range_vertex_is_reported_with_position() {
        let err = read(&[0, 2], &[1, 0], &[1, 1], 2, MergeRule::OppositeOnly).unwrap_err();
        assert_eq!(
            err,
            GraphError::IndexOutOfRange {
                what: "row",
                position: 1,
                index: 2,
                n: 2,
            }
        );
    }

    #[test]
    fn merge_overflow_is_an_error() {
        let err = read(
            &[0, 1, 1],
            &[1, 0, 0],
            &[1, u32::MAX, 1],
            2,
            MergeRule::OppositeOnly,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::CapacityOverflow { src: 1, dst: 0 }));
    }
}
