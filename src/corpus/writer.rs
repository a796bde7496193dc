//! Newline-delimited corpus output.

use anyhow::Context;
use std::fmt::Display;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::info;

/// Default buffer size for corpus writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from writing one corpus file.
#[derive(Debug, Clone, Default)]
pub struct WriteMetrics {
    /// Number of records written.
    pub records_written: u64,
    /// Time spent writing.
    pub write_duration: Duration,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

/// A fully written corpus waiting in a temporary file next to its target.
#[derive(Debug)]
pub struct PreparedCorpus {
    temp: NamedTempFile,
    path: PathBuf,
    records_written: u64,
    started: Instant,
}

/// Write one record per line to a temporary file in the directory of
/// `path`, flushed and synced. Nothing at `path` is touched until
/// [`PreparedCorpus::persist`].
pub fn prepare_corpus<T: Display>(path: &Path, records: &[T]) -> anyhow::Result<PreparedCorpus> {
    let started = Instant::now();
    if path.is_dir() {
        anyhow::bail!("Corpus target {path:?} is a directory");
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {dir:?}"))?;
    let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, temp);
    for record in records {
        writeln!(writer, "{record}").with_context(|| format!("Failed to write {path:?}"))?;
    }
    let temp = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("Failed to flush {path:?}"))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync {path:?}"))?;

    Ok(PreparedCorpus {
        temp,
        path: path.to_path_buf(),
        records_written: records.len() as u64,
        started,
    })
}

impl PreparedCorpus {
    /// Rename the temporary file over the target path.
    pub fn persist(self) -> anyhow::Result<WriteMetrics> {
        let path = self.path;
        let file = self
            .temp
            .persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move corpus into place at {path:?}"))?;
        let file_size_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);

        let metrics = WriteMetrics {
            records_written: self.records_written,
            write_duration: self.started.elapsed(),
            file_size_bytes,
        };
        info!(
            "Wrote {} records ({} bytes) to {}",
            metrics.records_written,
            metrics.file_size_bytes,
            path.display()
        );
        Ok(metrics)
    }
}

/// Write one record per line to `path`.
///
/// Records go to a temporary file in the same directory which is renamed
/// over `path` once complete, so a failed run never leaves a truncated
/// corpus behind.
pub fn write_corpus<T: Display>(path: &Path, records: &[T]) -> anyhow::Result<WriteMetrics> {
    prepare_corpus(path, records)?.persist()
}
