//! Insert sinks that receive generated batches.
//!
//! The database server is reached through its own client, so the sinks
//! here are local stand-ins: [`JsonlSink`] writes one JSONL file per
//! flushed segment and [`CountingSink`] only counts (dry runs).

use crate::error::PopulatorError;
use async_trait::async_trait;
use loadgen_core::Batch;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Destination for generated batches.
#[async_trait]
pub trait InsertSink: Send {
    /// Insert one batch, returning the number of rows accepted.
    async fn insert(&mut self, batch: &Batch) -> Result<u64, PopulatorError>;

    /// Seal everything inserted since the previous flush.
    async fn flush(&mut self) -> Result<(), PopulatorError>;
}

#[async_trait]
impl<S: InsertSink + ?Sized> InsertSink for Box<S> {
    async fn insert(&mut self, batch: &Batch) -> Result<u64, PopulatorError> {
        (**self).insert(batch).await
    }

    async fn flush(&mut self) -> Result<(), PopulatorError> {
        (**self).flush().await
    }
}

/// Sink that accepts everything and keeps counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingSink {
    pub rows: u64,
    pub batches: u64,
    pub flushes: u64,
    /// Rows inserted since the last flush.
    pub pending_rows: u64,
    /// Row count of each flushed segment, in flush order.
    pub segment_rows: Vec<u64>,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InsertSink for CountingSink {
    async fn insert(&mut self, batch: &Batch) -> Result<u64, PopulatorError> {
        self.rows += batch.row_count;
        self.batches += 1;
        self.pending_rows += batch.row_count;
        Ok(batch.row_count)
    }

    async fn flush(&mut self) -> Result<(), PopulatorError> {
        self.flushes += 1;
        self.segment_rows.push(self.pending_rows);
        self.pending_rows = 0;
        Ok(())
    }
}

/// Sink that writes rows as JSON lines, one file per flushed segment.
///
/// Files are named `<prefix>-<segment:04>.jsonl` inside the output
/// directory. A file is opened on the first insert after a flush, so a flush
/// with nothing pending writes no file.
pub struct JsonlSink {
    dir: PathBuf,
    prefix: String,
    segment: u32,
    writer: Option<BufWriter<File>>,
    files: Vec<PathBuf>,
}

impl JsonlSink {
    /// Create a sink writing into an existing directory.
    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.to_string(),
            segment: 0,
            writer: None,
            files: Vec::new(),
        }
    }

    /// Create a sink writing into `dir`, creating it if needed.
    pub async fn create(dir: impl AsRef<Path>, prefix: &str) -> Result<Self, PopulatorError> {
        tokio::fs::create_dir_all(dir.as_ref()).await?;
        Ok(Self::new(dir, prefix))
    }

    /// Files written so far, including the one still open.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn segment_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}-{:04}.jsonl", self.prefix, self.segment))
    }

    async fn writer(&mut self) -> Result<&mut BufWriter<File>, PopulatorError> {
        if self.writer.is_none() {
            let path = self.segment_path();
            debug!("Opening segment file '{}'", path.display());
            let file = File::create(&path).await?;
            self.files.push(path);
            self.writer = Some(BufWriter::new(file));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| PopulatorError::Sink("segment writer missing".to_string()))
    }
}

#[async_trait]
impl InsertSink for JsonlSink {
    async fn insert(&mut self, batch: &Batch) -> Result<u64, PopulatorError> {
        let mut buf = Vec::new();
        for row in batch.to_rows() {
            serde_json::to_writer(&mut buf, &row)?;
            buf.push(b'\n');
        }

        let writer = self.writer().await?;
        writer.write_all(&buf).await?;
        Ok(batch.row_count)
    }

    async fn flush(&mut self) -> Result<(), PopulatorError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            writer.get_mut().sync_all().await?;
            self.segment += 1;
        }
        Ok(())
    }
}
