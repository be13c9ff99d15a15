//! Standalone benchmark runner.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use mf_bench::{BenchmarkSuite, default_benchmarks, run_scenario};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let crate_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = crate_path
        .parent()
        .and_then(|p| p.parent())
        .ok_or("Could not determine repo root")?
        .to_path_buf();

    println!("Max-Flow Benchmark Suite");
    println!("========================\n");

    let benchmarks = default_benchmarks();
    println!("Running {} benchmarks, 5 runs each...\n", benchmarks.len());

    let mut results = Vec::new();
    for (idx, scenario) in benchmarks.iter().enumerate() {
        print!("[{}/{}] {} ... ", idx + 1, benchmarks.len(), scenario.name);
        std::io::Write::flush(&mut std::io::stdout())?;

        match run_scenario(scenario, 5) {
            Ok(result) => {
                println!("OK (flow {})", result.flow);
                results.push(result);
            }
            Err(e) => {
                println!("FAILED");
                eprintln!("  Error: {}", e);
            }
        }
    }

    println!();
    for result in &results {
        println!(
            "{} ({} vertices, {} arcs, {})",
            result.scenario.name,
            result.vertex_count,
            result.arc_count,
            result.scenario.precision
        );
        for alg in &result.algorithms {
            println!(
                "  {:<28} {:.5}s (median), min: {:.5}s, max: {:.5}s",
                alg.algorithm.name(),
                alg.aggregate.solve_time_median_s,
                alg.aggregate.solve_time_min_s,
                alg.aggregate.solve_time_max_s
            );
        }
        println!();
    }

    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)?
        .as_secs();
    let baseline_json = serde_json::to_string_pretty(&BenchmarkSuite {
        timestamp: format!("timestamp_{}", timestamp),
        results,
    })?;

    let baseline_dir = repo_root.join("benchmarks");
    fs::create_dir_all(&baseline_dir)?;
    let baseline_path = baseline_dir.join("baseline.json");
    fs::write(&baseline_path, baseline_json)?;
    println!("Baseline saved to: {}", baseline_path.display());

    Ok(())
}
