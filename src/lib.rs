//! Append-only history of benchmark runs, keyed by suite and commit, as
//! consumed by a performance dashboard (`data.js`).

pub mod compare;
pub mod error;
pub mod file;
pub mod format;
pub mod schema;
pub mod store;
pub mod synthetic;

pub use error::{HistoryError, Result};
pub use format::{DataFormat, StoreOptions};
pub use schema::{BenchmarkResult, BenchmarkRun, CommitInfo, Person};
pub use store::{BenchmarkHistoryStore, SeriesPoint, DEFAULT_SUITE};
