// src/ingest.rs

//! Named-pipe ingestion.
//!
//! The metadata producer writes newline-delimited `key=value` lines into a FIFO
//! and terminates each record with an empty line. Reading is a single blocking
//! loop; records are handed to the caller one at a time.

use anyhow::{bail, Context, Result};
use log::*;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::os::unix::fs::FileTypeExt;
use std::path::Path;

use crate::metadata::MetadataRecord;

/// Read buffer size for the pipe.
const PIPE_BUFFER_SIZE: usize = 1024;

/// Makes sure `path` is a FIFO, creating it (mode 0644) if nothing is there.
pub fn ensure_fifo(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.file_type().is_fifo() => {
            debug!("ensure_fifo: '{}' already exists", path.display());
            Ok(())
        }
        Ok(_) => bail!("'{}' exists but is not a FIFO", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            mkfifo(path, Mode::from_bits_truncate(0o644))
                .with_context(|| format!("Failed to create FIFO '{}'", path.display()))?;
            info!("Created FIFO '{}'", path.display());
            Ok(())
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to stat metadata pipe '{}'", path.display()))
        }
    }
}

/// Opens the pipe for reading. Blocks until a writer shows up.
pub fn open_pipe(path: &Path) -> Result<RecordReader<BufReader<File>>> {
    info!("Waiting for a writer on '{}'", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open metadata pipe '{}'", path.display()))?;
    Ok(RecordReader::new(BufReader::with_capacity(
        PIPE_BUFFER_SIZE,
        file,
    )))
}

/// Splits a byte stream into `MetadataRecord`s.
pub struct RecordReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
    pending: MetadataRecord,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::with_capacity(256),
            pending: MetadataRecord::new(),
        }
    }

    /// Blocks until the next record is complete.
    ///
    /// End of stream flushes a pending partial record first.
    ///
    /// # Returns
    /// `Ok(None)` at end of stream
    pub fn next_record(&mut self) -> Result<Option<MetadataRecord>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.line)
                .context("Failed to read from metadata pipe")?;

            if read == 0 {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                debug!("RecordReader: flushing partial record at end of stream");
                return Ok(Some(std::mem::take(&mut self.pending)));
            }

            let line = String::from_utf8_lossy(&self.line);
            if line.trim().is_empty() {
                if self.pending.is_empty() {
                    trace!("RecordReader: ignoring blank line between records");
                    continue;
                }
                return Ok(Some(std::mem::take(&mut self.pending)));
            }
            self.pending.push_line(&line);
        }
    }
}

/// Feeds every record to `on_record` until the stream ends or fails.
///
/// # Returns
/// The number of records delivered
pub fn pump<R: BufRead>(
    reader: &mut RecordReader<R>,
    mut on_record: impl FnMut(MetadataRecord),
) -> usize {
    let mut delivered = 0;
    loop {
        match reader.next_record() {
            Ok(Some(record)) => {
                delivered += 1;
                on_record(record);
            }
            Ok(None) => {
                info!("Metadata pipe closed after {} records", delivered);
                break;
            }
            Err(e) => {
                error!("Stopping ingestion: {:#}", e);
                break;
            }
        }
    }
    delivered
}
