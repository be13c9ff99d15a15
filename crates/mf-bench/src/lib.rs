//! Benchmark and cross-check harness for the max-flow algorithms.
//!
//! A scenario generates a deterministic network, loads it once into a graph
//! registry at the scenario's precision, and then solves it repeatedly with each
//! selected algorithm. Every algorithm has to report the same flow value; a
//! disagreement fails the scenario.

pub mod network;

use std::cmp::Ordering;
use std::time::Instant;

use mf_app::{
    AlgorithmId, AppError, GraphHandle, GraphRegistry, GraphSource, LoadOptions, PersistPolicy,
    PrecisionMode, RunOptions, load_dense, load_sparse, run,
};
use mf_core::{Capacity, MfError, VertexIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use network::{InputLayout, Network, NetworkSpec, Topology};

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("network conversion: {0}")]
    Network(#[from] MfError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("{scenario}: {algorithm} found flow {found}, expected {expected}")]
    Disagreement {
        scenario: String,
        algorithm: String,
        expected: u64,
        found: u64,
    },

    #[error("{what}")]
    Setup { what: String },
}

pub type BenchResult<T> = Result<T, BenchError>;

/// A benchmark scenario definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkScenario {
    /// Unique identifier for this benchmark.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    pub network: NetworkSpec,
    pub precision: PrecisionMode,
    /// Worker threads handed to the parallel algorithms.
    pub threads: usize,
    /// Algorithms to run; empty means all of them.
    #[serde(default)]
    pub algorithms: Vec<AlgorithmId>,
    pub notes: Option<String>,
}

impl BenchmarkScenario {
    pub fn selected_algorithms(&self) -> Vec<AlgorithmId> {
        if self.algorithms.is_empty() {
            AlgorithmId::ALL.to_vec()
        } else {
            self.algorithms.clone()
        }
    }
}

/// One timed solve.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub flow: u64,
    pub solve_time_s: f64,
}

/// Aggregated statistics for multiple runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub run_count: usize,
    pub solve_time_median_s: f64,
    pub solve_time_min_s: f64,
    pub solve_time_max_s: f64,
}

/// Runs of one algorithm within a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    pub algorithm: AlgorithmId,
    pub runs: Vec<RunMetrics>,
    pub aggregate: AggregateMetrics,
}

/// Complete benchmark result for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub scenario: BenchmarkScenario,
    pub vertex_count: usize,
    pub arc_count: usize,
    pub load_time_s: f64,
    /// Flow value every algorithm agreed on.
    pub flow: u64,
    pub algorithms: Vec<AlgorithmResult>,
}

/// Collection of benchmark results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Register `network` at precision `V`/`C` and return its handle.
fn load_as<V: VertexIndex, C: Capacity>(
    registry: &mut GraphRegistry,
    network: &Network,
) -> BenchResult<GraphHandle> {
    let options = LoadOptions::default().with_persist(PersistPolicy::SaveOnly);
    let loaded = match network.layout {
        InputLayout::Dense => {
            let data = network.dense::<C>()?;
            load_dense::<V, C>(registry, &data, network.vertex_count, &options)?
        }
        InputLayout::Sparse => {
            let (rows, cols, caps) = network.triplets::<V, C>()?;
            load_sparse(
                registry,
                &rows,
                &cols,
                &caps,
                network.vertex_count,
                rows.len(),
                &options,
            )?
        }
    };
    loaded.handle.ok_or_else(|| BenchError::Setup {
        what: "save-only load returned no handle".into(),
    })
}

/// Load `network` into `registry` at `precision`.
pub fn load_network(
    registry: &mut GraphRegistry,
    network: &Network,
    precision: PrecisionMode,
) -> BenchResult<GraphHandle> {
    match precision {
        PrecisionMode::U32U32 => load_as::<u32, u32>(registry, network),
        PrecisionMode::U32U64 => load_as::<u32, u64>(registry, network),
        PrecisionMode::U64U32 => load_as::<u64, u32>(registry, network),
        PrecisionMode::U64U64 => load_as::<u64, u64>(registry, network),
    }
}

/// Run a single benchmark scenario, solving `times` times per algorithm.
pub fn run_scenario(scenario: &BenchmarkScenario, times: usize) -> BenchResult<BenchmarkResult> {
    let network = scenario.network.generate();
    let mut registry = GraphRegistry::new();

    let load_start = Instant::now();
    let handle = load_network(&mut registry, &network, scenario.precision)?;
    let load_time_s = load_start.elapsed().as_secs_f64();
    debug!(
        scenario = %scenario.id,
        vertices = network.vertex_count,
        arcs = network.arc_count(),
        load_time_s,
        "network loaded"
    );

    let options = RunOptions::default()
        .with_threads(scenario.threads)
        .with_precision(scenario.precision);

    let mut expected = None;
    let mut algorithms = Vec::new();
    for algorithm in scenario.selected_algorithms() {
        let mut runs = Vec::with_capacity(times);
        for _ in 0..times {
            let start = Instant::now();
            let flow = run(
                &registry,
                algorithm,
                GraphSource::Handle(handle),
                network.source,
                network.sink,
                &options,
            )?;
            let solve_time_s = start.elapsed().as_secs_f64();

            let expected = *expected.get_or_insert(flow);
            if flow != expected {
                return Err(BenchError::Disagreement {
                    scenario: scenario.id.clone(),
                    algorithm: algorithm.to_string(),
                    expected,
                    found: flow,
                });
            }
            runs.push(RunMetrics { flow, solve_time_s });
        }
        let aggregate = compute_aggregates(&runs);
        info!(
            scenario = %scenario.id,
            %algorithm,
            median_s = aggregate.solve_time_median_s,
            "algorithm timed"
        );
        algorithms.push(AlgorithmResult {
            algorithm,
            runs,
            aggregate,
        });
    }
    registry.destroy(handle);

    Ok(BenchmarkResult {
        scenario: scenario.clone(),
        vertex_count: network.vertex_count,
        arc_count: network.arc_count(),
        load_time_s,
        flow: expected.unwrap_or(0),
        algorithms,
    })
}

/// Solve `network` with `algorithm` at every precision and require one answer.
///
/// Precisions whose widths cannot hold the network are skipped. Returns the
/// agreed flow value.
pub fn cross_check_precisions(
    network: &Network,
    algorithm: AlgorithmId,
    threads: usize,
) -> BenchResult<u64> {
    let mut registry = GraphRegistry::new();
    let mut expected = None;
    for precision in PrecisionMode::ALL {
        let handle = match load_network(&mut registry, network, precision) {
            Ok(handle) => handle,
            Err(BenchError::Network(err)) => {
                debug!(%precision, %err, "precision skipped");
                continue;
            }
            Err(err) => return Err(err),
        };
        let flow = run(
            &registry,
            algorithm,
            GraphSource::Handle(handle),
            network.source,
            network.sink,
            &RunOptions::default().with_threads(threads),
        )?;
        registry.destroy(handle);

        let expected = *expected.get_or_insert(flow);
        if flow != expected {
            return Err(BenchError::Disagreement {
                scenario: format!("precision {precision}"),
                algorithm: algorithm.to_string(),
                expected,
                found: flow,
            });
        }
    }
    expected.ok_or_else(|| BenchError::Setup {
        what: "no precision can represent the network".into(),
    })
}

fn compute_aggregates(runs: &[RunMetrics]) -> AggregateMetrics {
    if runs.is_empty() {
        return AggregateMetrics::default();
    }

    let mut solve_times: Vec<_> = runs.iter().map(|r| r.solve_time_s).collect();
    solve_times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    AggregateMetrics {
        run_count: runs.len(),
        solve_time_median_s: solve_times[solve_times.len() / 2],
        solve_time_min_s: *solve_times.first().unwrap_or(&0.0),
        solve_time_max_s: *solve_times.last().unwrap_or(&0.0),
    }
}

/// Default set of benchmark scenarios, one per topology and precision mix.
pub fn default_benchmarks() -> Vec<BenchmarkScenario> {
    vec![
        BenchmarkScenario {
            id: "layered_small".to_string(),
            name: "Layered 8x16".to_string(),
            network: NetworkSpec {
                topology: Topology::Layered { layers: 8, width: 16 },
                max_capacity: 1_000,
                seed: 1,
            },
            precision: PrecisionMode::U32U32,
            threads: 2,
            algorithms: Vec::new(),
            notes: Some("Narrow widths; short augmenting paths".to_string()),
        },
        BenchmarkScenario {
            id: "layered_deep".to_string(),
            name: "Layered 64x8".to_string(),
            network: NetworkSpec {
                topology: Topology::Layered { layers: 64, width: 8 },
                max_capacity: 100,
                seed: 2,
            },
            precision: PrecisionMode::U32U64,
            threads: 4,
            algorithms: Vec::new(),
            notes: Some("Long paths; stresses global relabeling".to_string()),
        },
        BenchmarkScenario {
            id: "grid".to_string(),
            name: "Grid 24x24".to_string(),
            network: NetworkSpec {
                topology: Topology::Grid { rows: 24, cols: 24 },
                max_capacity: 500,
                seed: 3,
            },
            precision: PrecisionMode::U64U32,
            threads: 4,
            algorithms: Vec::new(),
            notes: Some("Antiparallel vertical edges".to_string()),
        },
        BenchmarkScenario {
            id: "complete_dense".to_string(),
            name: "Complete 48".to_string(),
            network: NetworkSpec {
                topology: Topology::Complete { n: 48 },
                max_capacity: 10_000,
                seed: 4,
            },
            precision: PrecisionMode::U64U64,
            threads: 2,
            algorithms: Vec::new(),
            notes: Some("Loaded through the dense reader".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny(topology: Topology) -> BenchmarkScenario {
        BenchmarkScenario {
            id: "tiny".to_string(),
            name: "Tiny".to_string(),
            network: NetworkSpec {
                topology,
                max_capacity: 20,
                seed: 11,
            },
            precision: PrecisionMode::U32U64,
            threads: 2,
            algorithms: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn default_benchmarks_are_defined() {
        let benchmarks = default_benchmarks();
        assert!(!benchmarks.is_empty());
        assert!(benchmarks.iter().all(|b| !b.id.is_empty()));
        assert!(benchmarks.iter().all(|b| b.threads >= 1));
    }

    #[test]
    fn scenario_runs_every_algorithm() {
        let result = run_scenario(&tiny(Topology::Layered { layers: 3, width: 4 }), 2).unwrap();
        assert_eq!(result.algorithms.len(), AlgorithmId::ALL.len());
        assert!(result.flow > 0);
        for alg in &result.algorithms {
            assert_eq!(alg.aggregate.run_count, 2);
            assert!(alg.runs.iter().all(|r| r.flow == result.flow));
        }
    }

    #[test]
    fn scenario_respects_algorithm_selection() {
        let mut scenario = tiny(Topology::Complete { n: 6 });
        scenario.algorithms = vec![AlgorithmId::Dinic, AlgorithmId::AhujaOrlinSegmented];
        let result = run_scenario(&scenario, 1).unwrap();
        let ids: Vec<_> = result.algorithms.iter().map(|a| a.algorithm).collect();
        assert_eq!(ids, scenario.algorithms);
    }

    #[test]
    fn aggregate_metrics_compute_correctly() {
        let runs = [0.3, 0.1, 0.2].map(|t| RunMetrics {
            flow: 1,
            solve_time_s: t,
        });
        let agg = compute_aggregates(&runs);
        assert_eq!(agg.run_count, 3);
        assert_eq!(agg.solve_time_median_s, 0.2);
        assert_eq!(agg.solve_time_min_s, 0.1);
        assert_eq!(agg.solve_time_max_s, 0.3);
        assert_eq!(compute_aggregates(&[]).run_count, 0);
    }

    #[test]
    fn benchmark_result_serializes() {
        let result = run_scenario(&tiny(Topology::Grid { rows: 2, cols: 2 }), 1).unwrap();
        let suite = BenchmarkSuite {
            timestamp: "test_timestamp".to_string(),
            results: vec![result],
        };
        let json = serde_json::to_string(&suite).expect("should serialize");
        assert!(json.contains("\"push-relabel-fifo\""));
        let back: BenchmarkSuite = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back.results[0].flow, suite.results[0].flow);
    }
}
