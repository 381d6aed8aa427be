//! The benchmark history store.
//!
//! An append-only log of benchmark runs grouped by suite name. The store is
//! a plain value: load it, append to it, serialize it back. Concurrent
//! writers are not supported; callers serialize appends externally (one CI
//! job at a time).

use crate::compare::{self, Comparison};
use crate::error::{HistoryError, Result};
use crate::format::{self, StoreOptions};
use crate::schema::{BenchmarkRun, CommitInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Suite name used by the reference dashboard.
pub const DEFAULT_SUITE: &str = "CPU Benchmark Results";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkHistoryStore {
    /// Epoch milliseconds; never lower than the date of any suite's last run.
    last_update: u64,
    #[serde(default)]
    repo_url: String,
    entries: BTreeMap<String, Vec<BenchmarkRun>>,
}

/// One plotted point of a named benchmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint<'a> {
    pub date: u64,
    pub value: f64,
    pub commit: &'a CommitInfo,
}

impl BenchmarkHistoryStore {
    /// An empty store: no suites, `last_update` 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo_url(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            ..Self::default()
        }
    }

    /// Parse a persisted artifact, either the `data.js` script form or bare
    /// JSON.
    ///
    /// Empty (or whitespace-only) input is a fresh, empty store. Anything
    /// else that does not have the expected shape is
    /// [`HistoryError::MalformedData`].
    pub fn load(input: &str) -> Result<Self> {
        let Some(payload) = format::json_payload(input) else {
            debug!("empty benchmark data, starting with an empty store");
            return Ok(Self::new());
        };

        let store: Self = serde_json::from_str(payload)
            .map_err(|e| HistoryError::MalformedData(e.to_string()))?;
        store.validate()?;

        debug!(
            suites = store.entries.len(),
            runs = store.run_count(),
            last_update = store.last_update,
            "loaded benchmark history"
        );
        Ok(store)
    }

    fn validate(&self) -> Result<()> {
        for (suite, runs) in &self.entries {
            for run in runs {
                if let Some(bad) = run.first_invalid() {
                    return Err(HistoryError::MalformedData(format!(
                        "suite {suite:?}, commit {}: benchmark {:?} has invalid value {}",
                        run.commit.id, bad.name, bad.value
                    )));
                }
            }
            if let Some(last) = runs.last() {
                if last.date > self.last_update {
                    return Err(HistoryError::MalformedData(format!(
                        "lastUpdate {} precedes the last run of suite {suite:?} ({})",
                        self.last_update, last.date
                    )));
                }
            }
        }
        Ok(())
    }

    /// Runs of `suite` in insertion order; empty for an unknown suite.
    pub fn get_runs(&self, suite: &str) -> &[BenchmarkRun] {
        self.entries.get(suite).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append `run` to `suite`, creating the suite if needed, and move
    /// `last_update` forward to the run's date if it is newer.
    ///
    /// Runs carrying negative or non-finite values are rejected, since they
    /// could not be loaded back.
    pub fn append_run(&mut self, suite: &str, run: BenchmarkRun) -> Result<()> {
        if let Some(bad) = run.first_invalid() {
            return Err(HistoryError::InvalidRun(format!(
                "benchmark {:?} has invalid value {}",
                bad.name, bad.value
            )));
        }

        info!(
            suite,
            commit = %run.commit.id,
            date = run.date,
            benches = run.benches.len(),
            "appending benchmark run"
        );

        self.last_update = self.last_update.max(run.date);
        self.entries.entry(suite.to_string()).or_default().push(run);
        Ok(())
    }

    /// Register `suite` without any runs.
    pub fn ensure_suite(&mut self, suite: &str) {
        self.entries.entry(suite.to_string()).or_default();
    }

    /// Deterministic text encoding, loadable with [`Self::load`].
    pub fn serialize(&self, options: &StoreOptions) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        debug!(
            format = options.format.as_str(),
            bytes = json.len(),
            "serialized benchmark history"
        );
        Ok(format::wrap(json, options.format))
    }

    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn set_repo_url(&mut self, repo_url: impl Into<String>) {
        self.repo_url = repo_url.into();
    }

    /// Suite names, sorted.
    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Total number of runs across all suites.
    pub fn run_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn latest_run(&self, suite: &str) -> Option<&BenchmarkRun> {
        self.get_runs(suite).last()
    }

    /// Distinct result names of `suite`, in the order they first appear.
    pub fn bench_names(&self, suite: &str) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for run in self.get_runs(suite) {
            for bench in &run.benches {
                if !names.contains(&bench.name.as_str()) {
                    names.push(&bench.name);
                }
            }
        }
        names
    }

    /// Points of the benchmark `name` across the runs of `suite`, in
    /// insertion order. Runs without that benchmark contribute nothing.
    pub fn series(&self, suite: &str, name: &str) -> Vec<SeriesPoint<'_>> {
        self.get_runs(suite)
            .iter()
            .filter_map(|run| {
                run.result(name).map(|r| SeriesPoint {
                    date: run.date,
                    value: r.value,
                    commit: &run.commit,
                })
            })
            .collect()
    }

    /// Compare the last two runs of `suite`; `None` with fewer than two.
    pub fn compare_latest(&self, suite: &str) -> Option<Vec<Comparison>> {
        match self.get_runs(suite) {
            [.., prev, curr] => Some(compare::compare_runs(prev, curr)),
            _ => None,
        }
    }
}
