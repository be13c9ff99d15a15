//! Synchronous push/relabel rounds for the parallel solvers.
//!
//! A round has two phases. In the push phase every active vertex plans its pushes
//! in parallel against a frozen snapshot of labels and excesses; the plans are then
//! applied one vertex at a time, so each edge pair and each excess slot has a single
//! writer. In the relabel phase every vertex that is still active and has no
//! admissible edge computes its new label in parallel, and the labels are written
//! back afterwards.

use mf_core::{Capacity, VertexIndex};
use mf_graph::ResidualEdge;
use rayon::prelude::*;

use crate::ahuja_orlin::scaled_amount;
use crate::error::SolverResult;
use crate::preflow::{Preflow, clamp_push, widen};

/// Pushes planned for one vertex: `(slot, amount)` in adjacency order.
pub(crate) type PushPlan<C> = (usize, Vec<(usize, C)>);

/// Plan pushes for `active` from a frozen state.
///
/// With `delta` set, pushes towards non-sink vertices follow the excess-scaling limit.
pub(crate) fn plan_pushes<V: VertexIndex, C: Capacity>(
    state: &Preflow<V, C>,
    active: &[usize],
    delta: Option<C>,
) -> Vec<PushPlan<C>> {
    active
        .par_iter()
        .map(|&u| {
            let mut remaining = state.excess[u];
            let mut pushes = Vec::new();
            for (slot, e) in state.graph.edges(u).iter().enumerate() {
                if remaining == 0 {
                    break;
                }
                if !state.is_admissible(u, e) {
                    continue;
                }
                let w = e.dst();
                let amount = match delta {
                    Some(delta) => scaled_amount(
                        remaining,
                        e.residual_capacity(),
                        state.excess[w],
                        delta,
                        w == state.sink,
                    ),
                    None => clamp_push(remaining, e.residual_capacity()),
                };
                pushes.push((slot, amount));
                remaining -= widen(amount);
            }
            (u, pushes)
        })
        .collect()
}

/// Apply planned pushes and collect every destination that received flow.
pub(crate) fn apply_pushes<V: VertexIndex, C: Capacity>(
    state: &mut Preflow<V, C>,
    plans: Vec<PushPlan<C>>,
    touched: &mut Vec<usize>,
) -> SolverResult<usize> {
    let mut applied = 0;
    for (u, pushes) in plans {
        for (slot, amount) in pushes {
            touched.push(state.graph.edge(u, slot).dst());
            state.push(u, slot, amount)?;
            applied += 1;
        }
    }
    Ok(applied)
}

/// New labels for vertices in `active` that are still active but have no
/// admissible edge left.
pub(crate) fn plan_relabels<V: VertexIndex, C: Capacity>(
    state: &Preflow<V, C>,
    active: &[usize],
) -> Vec<(usize, usize)> {
    active
        .par_iter()
        .filter(|&&u| {
            state.is_active(u)
                && !state
                    .graph
                    .edges(u)
                    .iter()
                    .any(|e| state.is_admissible(u, e))
        })
        .map(|&u| (u, state.min_neighbor_label(u)))
        .collect()
}

pub(crate) fn apply_relabels<V: VertexIndex, C: Capacity>(
    state: &mut Preflow<V, C>,
    relabels: &[(usize, usize)],
) {
    for &(u, label) in relabels {
        state.set_label(u, label);
    }
}

/// Push phase followed by relabel phase. Returns the number of pushes applied and
/// the vertices that received flow.
pub(crate) fn round<V: VertexIndex, C: Capacity>(
    state: &mut Preflow<V, C>,
    active: &[usize],
    delta: Option<C>,
) -> SolverResult<(usize, Vec<usize>)> {
    let plans = plan_pushes(state, active, delta);
    let mut touched = Vec::new();
    let pushes = apply_pushes(state, plans, &mut touched)?;
    let relabels = plan_relabels(state, active);
    apply_relabels(state, &relabels);
    Ok((pushes, touched))
}

/// Active vertices found by scanning `segments` contiguous vertex ranges in parallel.
///
/// `keep` filters further (used for the large-excess test of excess scaling).
pub(crate) fn scan_segments<V, C, F>(
    state: &Preflow<V, C>,
    segments: usize,
    keep: F,
) -> Vec<usize>
where
    V: VertexIndex,
    C: Capacity,
    F: Fn(usize) -> bool + Sync,
{
    let n = state.n();
    let width = n.div_ceil(segments.max(1)).max(1);
    let keep = &keep;
    (0..n.div_ceil(width))
        .into_par_iter()
        .flat_map_iter(|s| {
            let start = s * width;
            let end = (start + width).min(n);
            (start..end).filter(move |&v| state.is_active(v) && keep(v))
        })
        .collect()
}
