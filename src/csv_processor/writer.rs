//! Checkpointed output writers.
//!
//! [`AppendWriter`] streams accepted records straight into the destination and
//! flushes at every checkpoint, so an interrupted run loses at most one
//! interval of records (the file may then be truncated mid-stream).
//!
//! [`SnapshotWriter`] never writes the destination in place. Each checkpoint
//! writes a complete file to a sibling temporary path and atomically renames
//! it over the destination, which therefore always holds a whole snapshot.

use crate::state::{CheckpointCounter, CheckpointPolicy};
use crate::utils::{ChunkTailError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination format for an [`AppendWriter`].
pub trait RecordSink {
    type Record: ?Sized;

    fn write_record(&mut self, record: &Self::Record) -> Result<()>;

    /// Pushes buffered bytes to the OS, optionally syncing file data.
    fn flush(&mut self, sync: bool) -> Result<()>;
}

/// Plain text lines; every record gets a `\n` terminator.
pub struct LineSink {
    inner: BufWriter<File>,
}

impl LineSink {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: BufWriter::new(File::create(path)?),
        })
    }
}

impl RecordSink for LineSink {
    type Record = str;

    fn write_record(&mut self, record: &str) -> Result<()> {
        self.inner.write_all(record.as_bytes())?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self, sync: bool) -> Result<()> {
        self.inner.flush()?;
        if sync {
            self.inner.get_ref().sync_data()?;
        }
        Ok(())
    }
}

/// CSV rows written through the `csv` crate so fields are re-quoted as needed.
pub struct CsvSink {
    inner: csv::Writer<File>,
}

impl CsvSink {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(File::create(path)?),
        })
    }
}

impl RecordSink for CsvSink {
    type Record = [String];

    fn write_record(&mut self, record: &[String]) -> Result<()> {
        self.inner.write_record(record)?;
        Ok(())
    }

    fn flush(&mut self, sync: bool) -> Result<()> {
        self.inner.flush()?;
        if sync {
            self.inner.get_ref().sync_data()?;
        }
        Ok(())
    }
}

/// Append strategy: write immediately, flush every checkpoint interval.
pub struct AppendWriter<S: RecordSink> {
    sink: S,
    path: PathBuf,
    policy: CheckpointPolicy,
    counter: CheckpointCounter,
    records_written: usize,
}

impl AppendWriter<LineSink> {
    pub fn lines(path: impl Into<PathBuf>, policy: CheckpointPolicy) -> Result<Self> {
        let path = path.into();
        let sink = LineSink::create(&path)?;
        Ok(Self::new(sink, path, policy))
    }
}

impl AppendWriter<CsvSink> {
    pub fn csv(path: impl Into<PathBuf>, policy: CheckpointPolicy) -> Result<Self> {
        let path = path.into();
        let sink = CsvSink::create(&path)?;
        Ok(Self::new(sink, path, policy))
    }
}

impl<S: RecordSink> AppendWriter<S> {
    pub fn new(sink: S, path: PathBuf, policy: CheckpointPolicy) -> Self {
        Self {
            sink,
            path,
            policy,
            counter: policy.counter(),
            records_written: 0,
        }
    }

    pub fn write(&mut self, record: &S::Record) -> Result<()> {
        self.sink.write_record(record)?;
        self.records_written += 1;
        Ok(())
    }

    /// Marks one source record as consumed and flushes on a checkpoint.
    pub fn record_consumed(&mut self) -> Result<()> {
        if self.counter.record_consumed() {
            self.sink.flush(self.policy.sync())?;
            tracing::debug!(
                path = %self.path.display(),
                consumed = self.counter.consumed(),
                written = self.records_written,
                "Checkpoint flushed"
            );
        }
        Ok(())
    }

    /// Final flush. Returns the number of records written.
    pub fn finish(mut self) -> Result<usize> {
        self.sink.flush(self.policy.sync())?;
        Ok(self.records_written)
    }

    pub fn checkpoints(&self) -> usize {
        self.counter.checkpoints()
    }
}

/// Replace strategy: every checkpoint atomically swaps in a complete file.
pub struct SnapshotWriter {
    destination: PathBuf,
    temp_dir: PathBuf,
    policy: CheckpointPolicy,
    counter: CheckpointCounter,
    swaps: usize,
}

impl SnapshotWriter {
    /// The temporary file lives next to `destination` so the final rename
    /// stays on one filesystem.
    pub fn new(destination: impl Into<PathBuf>, policy: CheckpointPolicy) -> Result<Self> {
        let destination = destination.into();
        let file_name = destination.file_name().ok_or_else(|| {
            ChunkTailError::InvalidArgument(format!(
                "Output path has no file name: {}",
                destination.display()
            ))
        })?;
        if file_name.is_empty() {
            return Err(ChunkTailError::InvalidArgument(format!(
                "Output path has no file name: {}",
                destination.display()
            )));
        }
        let temp_dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            destination,
            temp_dir,
            policy,
            counter: policy.counter(),
            swaps: 0,
        })
    }

    /// Counts one source record; returns true when a snapshot is due.
    pub fn record_consumed(&mut self) -> bool {
        self.counter.record_consumed()
    }

    /// Writes `lines` (plus an optional trailer block) to a temporary sibling
    /// file and renames it over the destination.
    pub fn replace<'a, I>(&mut self, lines: I, trailer: Option<&str>) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let file_name = self
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!(".{}.", file_name);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".tmp");
        // Plain create mode so a fresh destination gets the usual umask.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let temp = builder.tempfile_in(&self.temp_dir)?;
        if let Ok(existing) = fs::metadata(&self.destination) {
            temp.as_file().set_permissions(existing.permissions())?;
        }

        let mut out = BufWriter::new(temp);
        let mut lines_written = 0usize;
        for line in lines {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            lines_written += 1;
        }
        if let Some(trailer) = trailer {
            out.write_all(trailer.as_bytes())?;
        }

        let temp: NamedTempFile = out.into_inner().map_err(|e| e.into_error())?;
        if self.policy.sync() {
            temp.as_file().sync_data()?;
        }
        temp.persist(&self.destination)?;
        self.swaps += 1;

        tracing::debug!(
            path = %self.destination.display(),
            consumed = self.counter.consumed(),
            lines = lines_written,
            "Snapshot swapped into place"
        );
        Ok(())
    }

    pub fn swaps(&self) -> usize {
        self.swaps
    }

    pub fn consumed(&self) -> usize {
        self.counter.consumed()
    }
}
