use serde::{Deserialize, Serialize};

/// Author or committer of a commit, as reported by the VCS host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub email: String,
    pub name: String,
    #[serde(rename = "username")]
    pub handle: String,
}

/// Commit provenance of a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub author: Person,
    pub committer: Person,
    /// `false` for merges and other commits that carry no change of their own.
    pub distinct: bool,
    pub id: String,
    pub message: String,
    /// ISO-8601, as handed over by the VCS host.
    pub timestamp: String,
    pub tree_id: String,
    pub url: String,
}

/// One named measurement within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Usually `<module>::<test>[<parameters>]`.
    pub name: String,
    pub value: f64,
    pub unit: String,

    /// Free-form spread annotation, e.g. `stddev: 0.0123`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Free-form detail, newline separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl BenchmarkResult {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            range: None,
            extra: None,
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Values must be finite and non-negative to survive a JSON round trip
    /// and to be plotted.
    pub fn has_valid_value(&self) -> bool {
        self.value.is_finite() && self.value >= 0.0
    }
}

/// One execution of the full benchmark set against one commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRun {
    pub commit: CommitInfo,
    /// Unix epoch milliseconds.
    pub date: u64,
    /// Harness that produced the measurements, e.g. `pytest`.
    pub tool: String,
    pub benches: Vec<BenchmarkResult>,
}

impl BenchmarkRun {
    /// First result carrying `name`, if any.
    pub fn result(&self, name: &str) -> Option<&BenchmarkResult> {
        self.benches.iter().find(|b| b.name == name)
    }

    /// The first result with an unusable value, if any.
    pub fn first_invalid(&self) -> Option<&BenchmarkResult> {
        self.benches.iter().find(|b| !b.has_valid_value())
    }
}
