//! Run-to-run comparison of benchmark results.
//!
//! Every comparison carries a `ratio` oriented so that values above 1.0 mean
//! the benchmark got worse, whichever direction its unit improves in.

use crate::schema::BenchmarkRun;
use tracing::warn;

/// Alert threshold used by the dashboard tooling: twice as bad.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Throughput-like units (`iter/sec`, `ops/s`).
    BiggerIsBetter,
    /// Everything else (`ns/iter`, `sec`, `bytes`).
    SmallerIsBetter,
}

impl Direction {
    pub fn for_unit(unit: &str) -> Self {
        let unit = unit.trim().to_ascii_lowercase();
        if unit.ends_with("/sec") || unit.ends_with("/s") || unit.ends_with("per second") {
            Direction::BiggerIsBetter
        } else {
            Direction::SmallerIsBetter
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub name: String,
    pub unit: String,
    pub previous: f64,
    pub current: f64,
    pub direction: Direction,
    /// > 1.0 is a slowdown.
    pub ratio: f64,
}

impl Comparison {
    pub fn is_regression(&self, threshold: f64) -> bool {
        self.ratio > threshold
    }
}

fn ratio(direction: Direction, previous: f64, current: f64) -> Option<f64> {
    let (num, denom) = match direction {
        Direction::BiggerIsBetter => (previous, current),
        Direction::SmallerIsBetter => (current, previous),
    };
    if denom == 0.0 {
        return None;
    }
    Some(num / denom)
}

/// Pair the results of two runs by name (first occurrence on each side).
///
/// Results present on only one side, or whose ratio would divide by zero,
/// are left out. Output follows the order of `current`.
pub fn compare_runs(previous: &BenchmarkRun, current: &BenchmarkRun) -> Vec<Comparison> {
    let mut out = Vec::new();
    for (i, curr) in current.benches.iter().enumerate() {
        if current.benches[..i].iter().any(|b| b.name == curr.name) {
            continue;
        }
        let Some(prev) = previous.result(&curr.name) else {
            continue;
        };
        if prev.unit != curr.unit {
            warn!(
                name = %curr.name,
                previous = %prev.unit,
                current = %curr.unit,
                "unit changed between runs, skipping comparison"
            );
            continue;
        }

        let direction = Direction::for_unit(&curr.unit);
        if let Some(ratio) = ratio(direction, prev.value, curr.value) {
            out.push(Comparison {
                name: curr.name.clone(),
                unit: curr.unit.clone(),
                previous: prev.value,
                current: curr.value,
                direction,
                ratio,
            });
        }
    }
    out
}

/// Comparisons whose ratio exceeds `threshold`.
pub fn regressions(comparisons: &[Comparison], threshold: f64) -> Vec<&Comparison> {
    comparisons
        .iter()
        .filter(|c| c.is_regression(threshold))
        .collect()
}
