//! Cross-algorithm integration tests.

use mf_core::Capacity;
use mf_graph::{
    BasicEdge, CachedEdge, MergeRule, ResidualEdge, ResidualGraph, load_dense, load_sparse,
    validate_linkage, validate_reverse_cache,
};
use mf_solver::{
    AhujaOrlin, AhujaOrlinSegment, Dinic, EdmondsKarp, MaxFlowAlgorithm, ParallelPushRelabel,
    PushRelabelFifo, PushRelabelHighest, PushRelabelSegment, SolverError, solve_with,
};
use proptest::prelude::*;

type V = u32;
type C = u64;

/// Run every algorithm on the same sparse input and return `(name, flow)` pairs.
fn all_flows(
    rows: &[V],
    cols: &[V],
    caps: &[C],
    n: usize,
    source: usize,
    sink: usize,
    threads: usize,
) -> Vec<(&'static str, C)> {
    flows_per_algorithm(rows, cols, caps, n, source, sink, threads)
}

fn flows_per_algorithm<K: Capacity>(
    rows: &[V],
    cols: &[V],
    caps: &[K],
    n: usize,
    source: usize,
    sink: usize,
    threads: usize,
) -> Vec<(&'static str, K)> {
    let basic = load_sparse::<BasicEdge<V, K>>(rows, cols, caps, n, MergeRule::OppositeOnly).unwrap();
    let cached =
        load_sparse::<CachedEdge<V, K>>(rows, cols, caps, n, MergeRule::OppositeOnly).unwrap();

    macro_rules! run {
        ($algo:ty, $graph:expr) => {
            solve_with::<$algo>($graph.clone(), source, sink, threads).unwrap()
        };
    }

    vec![
        ("edmonds-karp", run!(EdmondsKarp<V, K>, basic)),
        ("dinic", run!(Dinic<V, K>, basic)),
        ("push-relabel-fifo", run!(PushRelabelFifo<V, K>, cached)),
        ("push-relabel-highest", run!(PushRelabelHighest<V, K>, cached)),
        ("ahuja-orlin", run!(AhujaOrlin<V, K>, cached)),
        ("parallel-push-relabel", run!(ParallelPushRelabel<V, K>, cached)),
        ("push-relabel-segment", run!(PushRelabelSegment<V, K>, cached)),
        ("ahuja-orlin-segment", run!(AhujaOrlinSegment<V, K>, cached)),
    ]
}

/// Capacity of the cut between vertices reachable from `source` in `residual`
/// and the rest, measured on the unmodified graph.
fn reachable_cut<E: ResidualEdge<Cap = C>>(
    original: &ResidualGraph<E>,
    residual: &ResidualGraph<E>,
    source: usize,
) -> C {
    let n = residual.vertex_count();
    let mut seen = vec![false; n];
    seen[source] = true;
    let mut stack = vec![source];
    while let Some(u) = stack.pop() {
        for e in residual.edges(u) {
            if e.residual_capacity() > 0 && !seen[e.dst()] {
                seen[e.dst()] = true;
                stack.push(e.dst());
            }
        }
    }

    (0..n)
        .filter(|&u| seen[u])
        .flat_map(|u| original.edges(u).iter())
        .filter(|e| !seen[e.dst()])
        .map(|e| e.residual_capacity())
        .sum()
}

#[test]
fn four_vertex_diamond_every_algorithm() {
    // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3, all capacity 10
    #[rustfmt::skip]
    let data: [C; 16] = [
        0, 10, 10, 0,
        0, 0,  0,  10,
        0, 0,  0,  10,
        0, 0,  0,  0,
    ];

    let basic = load_dense::<BasicEdge<V, C>>(&data, 4).unwrap();
    assert_eq!(solve_with::<EdmondsKarp<V, C>>(basic.clone(), 0, 3, 1).unwrap(), 20);
    assert_eq!(solve_with::<Dinic<V, C>>(basic, 0, 3, 1).unwrap(), 20);

    let cached = load_dense::<CachedEdge<V, C>>(&data, 4).unwrap();
    for threads in [1, 2, 4] {
        assert_eq!(solve_with::<PushRelabelFifo<V, C>>(cached.clone(), 0, 3, threads).unwrap(), 20);
        assert_eq!(solve_with::<PushRelabelHighest<V, C>>(cached.clone(), 0, 3, threads).unwrap(), 20);
        assert_eq!(solve_with::<AhujaOrlin<V, C>>(cached.clone(), 0, 3, threads).unwrap(), 20);
        assert_eq!(solve_with::<ParallelPushRelabel<V, C>>(cached.clone(), 0, 3, threads).unwrap(), 20);
        assert_eq!(solve_with::<PushRelabelSegment<V, C>>(cached.clone(), 0, 3, threads).unwrap(), 20);
        assert_eq!(solve_with::<AhujaOrlinSegment<V, C>>(cached.clone(), 0, 3, threads).unwrap(), 20);
    }
}

#[test]
fn antiparallel_edges_carry_flow_both_ways() {
    // 0 -> 1 (5), 1 -> 0 (7) merge into one pair; 1 -> 2 (4), 0 -> 2 (1)
    let flows = all_flows(&[0, 1, 1, 0], &[1, 0, 2, 2], &[5, 7, 4, 1], 3, 0, 2, 2);
    for (name, flow) in flows {
        assert_eq!(flow, 5, "{name}");
    }
    // Reverse direction uses the 1 -> 0 capacity.
    let flows = all_flows(&[0, 1, 2], &[1, 0, 1], &[5, 7, 9], 3, 2, 0, 2);
    for (name, flow) in flows {
        assert_eq!(flow, 7, "{name}");
    }
}

#[test]
fn parallel_same_direction_edges_add_up() {
    // Two separate 0 -> 1 edges of 3 and 4.
    for (name, flow) in all_flows(&[0, 0], &[1, 1], &[3, 4], 2, 0, 1, 1) {
        assert_eq!(flow, 7, "{name}");
    }
}

#[test]
fn residual_graphs_stay_consistent() {
    let rows = [0, 0, 1, 1, 2, 3, 4, 4];
    let cols = [1, 2, 3, 4, 4, 5, 3, 5];
    let caps = [10, 10, 4, 8, 9, 10, 6, 10];
    let g = load_sparse::<CachedEdge<V, C>>(&rows, &cols, &caps, 6, MergeRule::OppositeOnly).unwrap();

    let mut solver = AhujaOrlinSegment::new(g.clone(), 0, 5, 3).unwrap();
    let flow = solver.find_max_flow().unwrap();
    assert_eq!(flow, 19);
    assert!(validate_linkage(solver.graph()).is_ok());
    assert!(validate_reverse_cache(solver.graph()).is_ok());
    assert_eq!(reachable_cut(&g, solver.graph(), 0), flow);
}

#[test]
fn invalid_terminals_are_rejected() {
    let g = load_dense::<BasicEdge<V, C>>(&[0, 1, 0, 0], 2).unwrap();
    assert!(matches!(
        EdmondsKarp::new(g.clone(), 0, 2, 1),
        Err(SolverError::ProblemSetup { .. })
    ));
    assert!(matches!(
        Dinic::new(g, 1, 1, 1),
        Err(SolverError::ProblemSetup { .. })
    ));
}

#[test]
fn narrow_widths() {
    let g = load_sparse::<CachedEdge<u32, u32>>(&[0, 1], &[1, 2], &[u32::MAX, u32::MAX], 3, MergeRule::OppositeOnly)
        .unwrap();
    assert_eq!(solve_with::<PushRelabelHighest<u32, u32>>(g, 0, 2, 1).unwrap(), u32::MAX);
}

#[test]
fn vertex_excess_beyond_the_capacity_width() {
    // Both source edges saturate into vertex 1, whose excess is then 2 * u32::MAX.
    let rows = [0, 0, 1];
    let cols = [1, 1, 2];
    let caps = [u32::MAX, u32::MAX, 1];
    for threads in [1, 4] {
        for (name, flow) in flows_per_algorithm::<u32>(&rows, &cols, &caps, 3, 0, 2, threads) {
            assert_eq!(flow, 1, "{name} with {threads} threads");
        }
    }
}

fn sparse_network() -> impl Strategy<Value = (usize, Vec<(V, V, C)>)> {
    (2_usize..9).prop_flat_map(|n| {
        let edge = (0..n as V, 0..n as V, 0..40 as C);
        (Just(n), prop::collection::vec(edge, 0..30))
    })
}

proptest! {
    #[test]
    fn every_algorithm_agrees_with_edmonds_karp(
        (n, triplets) in sparse_network(),
        threads in 1_usize..4,
    ) {
        let rows: Vec<V> = triplets.iter().map(|t| t.0).collect();
        let cols: Vec<V> = triplets.iter().map(|t| t.1).collect();
        let caps: Vec<C> = triplets.iter().map(|t| t.2).collect();
        let sink = n - 1;

        let flows = all_flows(&rows, &cols, &caps, n, 0, sink, threads);
        let reference = flows[0].1;
        for (name, flow) in &flows {
            prop_assert_eq!(*flow, reference, "{} disagrees", name);
        }

        let g = load_sparse::<BasicEdge<V, C>>(&rows, &cols, &caps, n, MergeRule::OppositeOnly).unwrap();
        let mut ek = EdmondsKarp::new(g.clone(), 0, sink, 1).unwrap();
        let flow = ek.find_max_flow().unwrap();
        prop_assert_eq!(reachable_cut(&g, ek.graph(), 0), flow);
    }
}
