use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mf_app::{AlgorithmId, PrecisionMode, algorithm_names};
use mf_bench::{
    BenchmarkResult, BenchmarkSuite, NetworkSpec, Topology, cross_check_precisions,
    default_benchmarks, run_scenario,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(about = "Max-flow CLI - residual graph loading and solver benchmarks", long_about = None)]
struct Cli {
    /// Log wall-clock timings of loads and runs
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List algorithm identifiers
    Algorithms {
        /// Also show whether each algorithm is parallel and its edge layout
        #[arg(long)]
        verbose: bool,
    },
    /// Run benchmark scenarios and cross-check flow values
    Bench {
        /// Only run the scenario with this id
        #[arg(long)]
        scenario: Option<String>,
        /// Timed runs per algorithm
        #[arg(long, default_value_t = 3)]
        times: usize,
        /// Override the thread count of every scenario
        #[arg(long)]
        threads: Option<usize>,
        /// Override the precision of every scenario (e.g. u32-u64)
        #[arg(long)]
        precision: Option<PrecisionMode>,
        /// Restrict to these algorithms (repeatable)
        #[arg(long = "algorithm")]
        algorithms: Vec<AlgorithmId>,
        /// Write the JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Solve one generated layered network at every precision
    Check {
        #[arg(long, default_value_t = 6)]
        layers: usize,
        #[arg(long, default_value_t = 6)]
        width: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 2)]
        threads: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.timing {
        mf_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Algorithms { verbose } => cmd_algorithms(verbose),
        Commands::Bench {
            scenario,
            times,
            threads,
            precision,
            algorithms,
            json,
        } => cmd_bench(
            scenario.as_deref(),
            times,
            threads,
            precision,
            &algorithms,
            json.as_deref(),
        ),
        Commands::Check {
            layers,
            width,
            seed,
            threads,
        } => cmd_check(layers, width, seed, threads),
    }
}

fn cmd_algorithms(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !verbose {
        for name in algorithm_names() {
            println!("{name}");
        }
        return Ok(());
    }
    for algorithm in AlgorithmId::ALL {
        println!(
            "{:<28} {:<10} {} edges",
            algorithm.name(),
            if algorithm.is_parallel() { "parallel" } else { "sequential" },
            algorithm.edge_kind()
        );
    }
    Ok(())
}

fn cmd_bench(
    only: Option<&str>,
    times: usize,
    threads: Option<usize>,
    precision: Option<PrecisionMode>,
    algorithms: &[AlgorithmId],
    json: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenarios = default_benchmarks();
    if let Some(id) = only {
        scenarios.retain(|s| s.id == id);
        if scenarios.is_empty() {
            return Err(format!("unknown scenario '{id}'").into());
        }
    }

    let mut results = Vec::new();
    for mut scenario in scenarios {
        if let Some(threads) = threads {
            scenario.threads = threads;
        }
        if let Some(precision) = precision {
            scenario.precision = precision;
        }
        if !algorithms.is_empty() {
            scenario.algorithms = algorithms.to_vec();
        }
        info!(scenario = %scenario.id, "running");
        let result = run_scenario(&scenario, times.max(1))?;
        print_result(&result);
        results.push(result);
    }

    if let Some(path) = json {
        let suite = BenchmarkSuite {
            timestamp: format!("timestamp_{}", unix_seconds()),
            results,
        };
        std::fs::write(path, serde_json::to_string_pretty(&suite)?)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn cmd_check(
    layers: usize,
    width: usize,
    seed: u64,
    threads: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let network = NetworkSpec {
        topology: Topology::Layered { layers, width },
        max_capacity: 1_000,
        seed,
    }
    .generate();
    println!(
        "Layered {layers}x{width}: {} vertices, {} arcs",
        network.vertex_count,
        network.arc_count()
    );
    for algorithm in AlgorithmId::ALL {
        let flow = cross_check_precisions(&network, algorithm, threads)?;
        println!("  {:<28} {flow}", algorithm.name());
    }
    Ok(())
}

fn print_result(result: &BenchmarkResult) {
    println!(
        "{} [{}] flow {} ({} vertices, {} arcs, load {:.4}s)",
        result.scenario.name,
        result.scenario.precision,
        result.flow,
        result.vertex_count,
        result.arc_count,
        result.load_time_s
    );
    for alg in &result.algorithms {
        println!(
            "  {:<28} median {:.5}s  min {:.5}s  max {:.5}s",
            alg.algorithm.name(),
            alg.aggregate.solve_time_median_s,
            alg.aggregate.solve_time_min_s,
            alg.aggregate.solve_time_max_s
        );
    }
}

fn unix_seconds() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
