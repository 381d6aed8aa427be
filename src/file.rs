//! Loading and saving the history artifact on disk.

use crate::error::Result;
use crate::format::{DataFormat, StoreOptions};
use crate::store::BenchmarkHistoryStore;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Load the store at `path`.
///
/// A missing or empty file yields an empty store; the artifact is created
/// lazily by the first save.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<BenchmarkHistoryStore> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "benchmark data not found, starting empty");
            return Ok(BenchmarkHistoryStore::new());
        }
        Err(e) => return Err(e.into()),
    };
    BenchmarkHistoryStore::load(&text)
}

/// Options matching the file extension of `path` (`.json` or script).
pub fn options_for<P: AsRef<Path>>(path: P) -> StoreOptions {
    let ext = path.as_ref().extension().and_then(|e| e.to_str());
    StoreOptions {
        format: DataFormat::from_extension(ext),
    }
}

/// Write the store to `path`, replacing it atomically.
///
/// The text goes to a temporary file in the same directory first, so readers
/// see either the old artifact or the new one.
pub fn save_path<P: AsRef<Path>>(
    store: &BenchmarkHistoryStore,
    path: P,
    options: &StoreOptions,
) -> Result<()> {
    let path = path.as_ref();
    let text = store.serialize(options)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!(
        path = %path.display(),
        runs = store.run_count(),
        bytes = text.len(),
        "saved benchmark history"
    );
    Ok(())
}

/// Load, append one run, save. The caller must ensure no other writer
/// touches `path` meanwhile.
pub fn append_to_path<P: AsRef<Path>>(
    path: P,
    suite: &str,
    run: crate::schema::BenchmarkRun,
) -> Result<BenchmarkHistoryStore> {
    let path = path.as_ref();
    let mut store = load_path(path)?;
    store.append_run(suite, run)?;
    save_path(&store, path, &options_for(path))?;
    Ok(store)
}
