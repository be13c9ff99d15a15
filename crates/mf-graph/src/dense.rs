//! Dense capacity reader.

use mf_core::{Capacity, VertexIndex};
use tracing::debug;

use crate::edge_list::EdgeList;
use crate::error::GraphResult;
use crate::input::DenseCapacities;

/// Turn an `n × n` capacity matrix into a flat edge-pair list.
///
/// Only the upper triangle `i < j` is scanned, producing at most one pair per
/// unordered vertex pair:
/// - `capacity(i, j) != 0`: forward `i → j` with `capacity(i, j)`, mirror `j → i`
///   with `capacity(j, i)`.
/// - otherwise, if `capacity(j, i) != 0`: forward `i → j` with `capacity(j, i)` and
///   mirror `j → i` with zero.
///
/// The second rule is part of the input convention and is kept as is.
pub fn read_dense<V: VertexIndex, C: Capacity>(
    matrix: &DenseCapacities<'_, C>,
) -> GraphResult<EdgeList<V, C>> {
    let n = matrix.vertex_count();
    if n > 0 {
        // Every index below n must be representable.
        V::from_usize(n - 1)?;
    }

    let mut list = EdgeList::with_capacity(n, 0);
    for i in 0..n {
        let vi = V::from_usize(i)?;
        for j in (i + 1)..n {
            let forward = matrix.capacity(i, j);
            let backward = matrix.capacity(j, i);
            let vj = V::from_usize(j)?;
            if !forward.is_zero() {
                list.push_pair(vi, vj, forward, backward);
            } else if !backward.is_zero() {
                list.push_pair(vi, vj, backward, C::ZERO);
            }
        }
    }

    debug!(n, pairs = list.pair_count(), "read dense capacity matrix");
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &[u32], n: usize) -> EdgeList<u32, u32> {
        read_dense(&DenseCapacities::new(data, n).unwrap()).unwrap()
    }

    #[test]
    fn upper_triangle_value_wins() {
        // 0 -> 1 = 7, 1 -> 0 = 2
        let list = read(&[0, 7, 2, 0], 2);
        assert_eq!(list.pair_count(), 1);
        assert_eq!(list.pair(0), (0, 1, 7, 2));
    }

    #[test]
    fn lower_triangle_fallback_keeps_forward_orientation() {
        let list = read(&[0, 0, 5, 0], 2);
        assert_eq!(list.pair_count(), 1);
        assert_eq!(list.pair(0), (0, 1, 5, 0));
    }

    #[test]
    fn zero_pairs_and_diagonal_are_skipped() {
        #[rustfmt::skip]
        let data = [
            9, 0, 3,
            0, 9, 0,
            0, 0, 9,
        ];
        let list = read(&data, 3);
        assert_eq!(list.pair_count(), 1);
        assert_eq!(list.pair(0), (0, 2, 3, 0));
        assert_eq!(list.outgoing_counts(), &[1, 0, 1]);
    }

    #[test]
    fn pairs_follow_row_major_scan() {
        #[rustfmt::skip]
        let data = [
            0, 1, 2,
            0, 0, 3,
            0, 0, 0,
        ];
        let list = read(&data, 3);
        let pairs: Vec<_> = (0..list.pair_count()).map(|p| list.pair(p)).collect();
        assert_eq!(pairs, vec![(0, 1, 1, 0), (0, 2, 2, 0), (1, 2, 3, 0)]);
        assert_eq!(list.outgoing_counts(), &[2, 2, 2]);
    }

    #[test]
    fn empty_matrix() {
        let list = read(&[], 0);
        assert_eq!(list.pair_count(), 0);
        assert_eq!(list.vertex_count(), 0);
    }
}
