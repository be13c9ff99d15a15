//! Typed, bounds-checked views over caller-supplied capacity buffers.
//!
//! A view is validated once, when it is created; readers can then index it
//! without re-checking shapes.

use mf_core::{Capacity, VertexIndex};

use crate::error::{GraphError, GraphResult};

/// Row-major `n × n` capacity matrix; `capacity(i, j)` is the capacity of `i → j`.
#[derive(Debug, Clone, Copy)]
pub struct DenseCapacities<'a, C> {
    data: &'a [C],
    n: usize,
}

impl<'a, C: Capacity> DenseCapacities<'a, C> {
    /// Fails with `InvalidInput` when `data` holds fewer than `n * n` entries.
    ///
    /// Entries past `n * n` are ignored.
    pub fn new(data: &'a [C], n: usize) -> GraphResult<Self> {
        let cells = n
            .checked_mul(n)
            .ok_or_else(|| GraphError::invalid(format!("dense matrix size {n}x{n} overflows")))?;
        if data.len() < cells {
            return Err(GraphError::invalid(format!(
                "dense buffer holds {} entries, expected {} ({n}x{n})",
                data.len(),
                cells
            )));
        }
        Ok(Self {
            data: &data[..cells],
            n,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn capacity(&self, i: usize, j: usize) -> C {
        self.data[i * self.n + j]
    }
}

/// Sparse network as parallel `(row, col, capacity)` arrays of one length `m`.
#[derive(Debug, Clone, Copy)]
pub struct SparseTriplets<'a, V, C> {
    rows: &'a [V],
    cols: &'a [V],
    capacities: &'a [C],
    n: usize,
}

impl<'a, V: VertexIndex, C: Capacity> SparseTriplets<'a, V, C> {
    /// Fails with `InvalidInput` unless all three arrays have the same length.
    pub fn new(rows: &'a [V], cols: &'a [V], capacities: &'a [C], n: usize) -> GraphResult<Self> {
        Self::with_len(rows, cols, capacities, n, rows.len())
    }

    /// Like [`SparseTriplets::new`] but also checks the arrays against an explicit
    /// triplet count `m`.
    pub fn with_len(
        rows: &'a [V],
        cols: &'a [V],
        capacities: &'a [C],
        n: usize,
        m: usize,
    ) -> GraphResult<Self> {
        for (what, len) in [
            ("rows", rows.len()),
            ("cols", cols.len()),
            ("capacities", capacities.len()),
        ] {
            if len != m {
                return Err(GraphError::invalid(format!(
                    "sparse {what} array has length {len}, expected {m}"
                )));
            }
        }
        Ok(Self {
            rows,
            cols,
            capacities,
            n,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Triplets in input order. Vertex indices are not range-checked here.
    pub fn iter(&self) -> impl Iterator<Item = (V, V, C)> + '_ {
        self.rows
            .iter()
            .zip(self.cols)
            .zip(self.capacities)
            .map(|((&r, &c), &cap)| (r, c, cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_rejects_short_buffer() {
        let data = [0_u32; 8];
        let err = DenseCapacities::new(&data, 3).unwrap_err();
        assert!(matches!(err, GraphError::InvalidInput { .. }));
    }

    #[test]
    fn dense_indexes_row_major() {
        let data = [0_u64, 1, 2, 3];
        let m = DenseCapacities::new(&data, 2).unwrap();
        assert_eq!(m.capacity(0, 1), 1);
        assert_eq!(m.capacity(1, 0), 2);
    }

    #[test]
    fn sparse_rejects_mismatched_lengths() {
        let rows = [0_u32, 1];
        let cols = [1_u32];
        let caps = [5_u32, 6];
        let err = SparseTriplets::new(&rows, &cols, &caps, 2).unwrap_err();
        assert!(err.to_string().contains("cols"));
    }

    #[test]
    fn sparse_checks_explicit_count() {
        let rows = [0_u32, 1];
        let cols = [1_u32, 0];
        let caps = [5_u32, 6];
        assert!(SparseTriplets::with_len(&rows, &cols, &caps, 2, 3).is_err());
        let view = SparseTriplets::with_len(&rows, &cols, &caps, 2, 2).unwrap();
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![(0, 1, 5), (1, 0, 6)]);
    }
}
