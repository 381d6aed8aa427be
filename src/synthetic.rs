//! Deterministic synthetic benchmark histories.
//!
//! Produces stores shaped like a real CI history (one suite per config
//! entry, parameterized benchmark names, commit provenance, `stddev` ranges)
//! for load/serialize benchmarks and tests. The same config always yields
//! the same store.

use crate::error::Result;
use crate::schema::{BenchmarkResult, BenchmarkRun, CommitInfo, Person};
use crate::store::BenchmarkHistoryStore;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// First run date: 2023-05-07T17:11:13.632Z.
const BASE_DATE_MS: u64 = 1_683_479_473_632;

/// Spacing between synthetic commits.
const RUN_INTERVAL_MS: u64 = 3_600_000;

const MODULES: &[&str] = &[
    "benchmarks/test_collectors_benchmark.py",
    "benchmarks/test_envs_benchmark.py",
    "benchmarks/test_objectives_benchmarks.py",
    "benchmarks/test_replaybuffer_benchmark.py",
];

const STORAGES: &[&str] = &["ListStorage", "LazyTensorStorage", "LazyMemmapStorage"];

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Suite names; each gets `runs` runs.
    pub suites: Vec<String>,
    pub runs: usize,
    pub benches_per_run: usize,
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            suites: vec![crate::store::DEFAULT_SUITE.to_string()],
            runs: 100,
            benches_per_run: 40,
            seed: 42,
        }
    }
}

fn per_run_seed(master_seed: u64, index: usize) -> u64 {
    master_seed
        .wrapping_add(index as u64)
        .wrapping_mul(0x517cc1b727220a95)
}

fn hex_id(rng: &mut ChaCha8Rng) -> String {
    (0..20).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

fn bench_name(i: usize) -> String {
    let module = MODULES[i % MODULES.len()];
    let storage = STORAGES[(i / MODULES.len()) % STORAGES.len()];
    format!("{module}::test_case_{i}[{storage}-{}]", 100 * (1 + i % 4))
}

/// Baseline throughput of benchmark `i`, stable across runs so series look
/// like series rather than noise.
fn baseline(i: usize) -> f64 {
    0.03 + (i % 17) as f64 * 0.05
}

fn generate_run(seed: u64, index: usize, benches_per_run: usize) -> BenchmarkRun {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let id = hex_id(&mut rng);
    let tree_id = hex_id(&mut rng);

    let benches = (0..benches_per_run)
        .map(|i| {
            let value = baseline(i) * rng.gen_range(0.8..1.2);
            let stddev = value * rng.gen_range(0.01..0.2);
            let rounds = 5;
            BenchmarkResult::new(bench_name(i), value, "iter/sec")
                .with_range(format!("stddev: {stddev}"))
                .with_extra(format!("mean: {} sec\nrounds: {rounds}", 1.0 / value))
        })
        .collect();

    BenchmarkRun {
        commit: CommitInfo {
            author: Person {
                email: "dev@example.com".to_string(),
                name: "Bench Dev".to_string(),
                handle: "bench-dev".to_string(),
            },
            committer: Person {
                email: "noreply@github.com".to_string(),
                name: "GitHub".to_string(),
                handle: "web-flow".to_string(),
            },
            distinct: true,
            url: format!("https://github.com/example/repo/commit/{id}"),
            message: format!("Synthetic commit #{index}"),
            // Wall-clock text only; `date` carries the ordering.
            timestamp: format!("2023-05-07T{:02}:11:13+00:00", index % 24),
            tree_id,
            id,
        },
        date: BASE_DATE_MS + index as u64 * RUN_INTERVAL_MS,
        tool: "pytest".to_string(),
        benches,
    }
}

/// Generate the runs of one suite, in date order.
///
/// Runs are generated in parallel from seeds derived from the master seed
/// and the run index, so the output does not depend on scheduling.
pub fn generate_runs(seed: u64, runs: usize, benches_per_run: usize) -> Vec<BenchmarkRun> {
    (0..runs)
        .into_par_iter()
        .map(|i| generate_run(per_run_seed(seed, i), i, benches_per_run))
        .collect()
}

/// Generate a whole store.
pub fn generate_store(config: &GenerateConfig) -> Result<BenchmarkHistoryStore> {
    let mut store = BenchmarkHistoryStore::with_repo_url("https://github.com/example/repo");
    for (s, suite) in config.suites.iter().enumerate() {
        store.ensure_suite(suite);
        let seed = config.seed.wrapping_add((s as u64) << 32);
        for run in generate_runs(seed, config.runs, config.benches_per_run) {
            store.append_run(suite, run)?;
        }
    }
    Ok(store)
}
