use bench_history::compare::{regressions, DEFAULT_ALERT_THRESHOLD};
use bench_history::file::{append_to_path, load_path};
use bench_history::{
    BenchmarkHistoryStore, BenchmarkResult, BenchmarkRun, HistoryError, StoreOptions,
    DEFAULT_SUITE,
};
use std::fs;
use tempfile::tempdir;

const FIXTURE: &str = include_str!("fixtures/data.js");

fn next_run(store: &BenchmarkHistoryStore, date: u64, scale: f64) -> BenchmarkRun {
    let mut run = store.latest_run(DEFAULT_SUITE).unwrap().clone();
    run.commit.id = format!("{:040x}", date);
    run.date = date;
    for bench in &mut run.benches {
        bench.value *= scale;
    }
    run
}

#[test]
fn test_load_reference_artifact() {
    let store = BenchmarkHistoryStore::load(FIXTURE).unwrap();

    assert_eq!(store.last_update(), 1683479476052);
    assert_eq!(store.repo_url(), "https://github.com/XuehaiPan/torchrl");
    assert_eq!(store.suite_names().collect::<Vec<_>>(), vec![DEFAULT_SUITE]);

    let runs = store.get_runs(DEFAULT_SUITE);
    assert_eq!(runs.len(), 1);

    let run = &runs[0];
    assert_eq!(run.date, 1683479473632);
    assert_eq!(run.tool, "pytest");
    assert_eq!(run.commit.author.handle, "vmoens");
    assert_eq!(run.commit.committer.handle, "web-flow");
    assert!(run.commit.distinct);
    assert_eq!(run.benches.len(), 6);

    let first = &run.benches[0];
    assert_eq!(
        first.name,
        "benchmarks/test_collectors_benchmark.py::test_single"
    );
    assert_eq!(first.value, 0.04358102871811584);
    assert_eq!(first.unit, "iter/sec");
    assert_eq!(first.range.as_deref(), Some("stddev: 0.44649944070713327"));
    assert_eq!(
        first.extra.as_deref(),
        Some("mean: 22.945764003599994 sec\nrounds: 5")
    );
}

#[test]
fn test_reference_artifact_reserializes_byte_for_byte() {
    let store = BenchmarkHistoryStore::load(FIXTURE).unwrap();
    let text = store.serialize(&StoreOptions::default()).unwrap();
    assert_eq!(text, FIXTURE);
}

#[test]
fn test_plain_json_form_loads_the_same() {
    let store = BenchmarkHistoryStore::load(FIXTURE).unwrap();
    let json = FIXTURE
        .strip_prefix(bench_history::format::JS_PREFIX)
        .unwrap();
    assert_eq!(BenchmarkHistoryStore::load(json).unwrap(), store);
}

#[test]
fn test_append_to_reference_artifact() {
    let mut store = BenchmarkHistoryStore::load(FIXTURE).unwrap();
    let before = store.get_runs(DEFAULT_SUITE).to_vec();

    let run = next_run(&store, 1683500000000, 1.0);
    store.append_run(DEFAULT_SUITE, run.clone()).unwrap();

    let runs = store.get_runs(DEFAULT_SUITE);
    assert_eq!(runs.len(), 2);
    assert_eq!(&runs[..1], before.as_slice());
    assert_eq!(runs[1], run);
    assert_eq!(store.last_update(), 1683500000000);

    let reloaded =
        BenchmarkHistoryStore::load(&store.serialize(&StoreOptions::default()).unwrap())
            .unwrap();
    assert_eq!(reloaded, store);
}

#[test]
fn test_series_over_reference_history() {
    let mut store = BenchmarkHistoryStore::load(FIXTURE).unwrap();
    let run = next_run(&store, 1683500000000, 0.5);
    store.append_run(DEFAULT_SUITE, run).unwrap();

    let name = "benchmarks/test_envs_benchmark.py::test_simple";
    let series = store.series(DEFAULT_SUITE, name);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, 1683479473632);
    assert_eq!(series[1].date, 1683500000000);
    assert_eq!(series[1].value, series[0].value * 0.5);
    assert_eq!(store.bench_names(DEFAULT_SUITE).len(), 6);
}

#[test]
fn test_throughput_collapse_raises_alerts() {
    let mut store = BenchmarkHistoryStore::load(FIXTURE).unwrap();
    let run = next_run(&store, 1683500000000, 0.25);
    store.append_run(DEFAULT_SUITE, run).unwrap();

    let comparisons = store.compare_latest(DEFAULT_SUITE).unwrap();
    assert_eq!(comparisons.len(), 6);
    assert!(comparisons.iter().all(|c| (c.ratio - 4.0).abs() < 1e-9));
    assert_eq!(regressions(&comparisons, DEFAULT_ALERT_THRESHOLD).len(), 6);
}

#[test]
fn test_ci_append_cycle_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dev").join("bench").join("data.js");

    let seed = BenchmarkHistoryStore::load(FIXTURE).unwrap();
    let first = next_run(&seed, 1683479473632, 1.0);
    let second = next_run(&seed, 1683479999999, 1.1);

    append_to_path(&path, DEFAULT_SUITE, first.clone()).unwrap();
    append_to_path(&path, DEFAULT_SUITE, second.clone()).unwrap();

    let store = load_path(&path).unwrap();
    assert_eq!(store.get_runs(DEFAULT_SUITE), &[first, second]);
    assert_eq!(store.last_update(), 1683479999999);
}

#[test]
fn test_corrupted_artifact_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.js");
    let truncated = &FIXTURE[..FIXTURE.len() / 2];
    fs::write(&path, truncated).unwrap();

    assert!(matches!(
        load_path(&path).unwrap_err(),
        HistoryError::MalformedData(_)
    ));
}

#[test]
fn test_append_rejects_negative_measurement() {
    let mut store = BenchmarkHistoryStore::load(FIXTURE).unwrap();
    let mut run = next_run(&store, 1683500000000, 1.0);
    run.benches
        .push(BenchmarkResult::new("benchmarks/x.py::test_bad", -1.0, "iter/sec"));

    assert!(matches!(
        store.append_run(DEFAULT_SUITE, run),
        Err(HistoryError::InvalidRun(_))
    ));
    assert_eq!(store.get_runs(DEFAULT_SUITE).len(), 1);
    assert_eq!(store.last_update(), 1683479476052);
}
