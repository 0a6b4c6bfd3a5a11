//! Log line ingestion: follows a file across rotation and truncation.
//!
//! The follow mechanism is a poll-and-reopen loop keyed on the path, not a
//! held file handle: each poll re-checks the file's metadata, resets the read
//! offset when the inode changes (rotation) or the file shrinks (truncation),
//! and reads any bytes appended since the last poll. The rest of the watcher
//! only sees the `LineSource` seam.

use std::{
    collections::VecDeque,
    io::SeekFrom,
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncSeekExt, BufReader},
};

/// Errors that can occur while ingesting log lines.
#[derive(Debug, Error)]
pub enum TailError {
    /// The target log file did not exist when the tailer was created. This
    /// is the single fatal ingestion condition.
    #[error("Log file not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error surfaced by the follow loop.
    #[error("I/O error while following log: {0}")]
    Io(#[from] std::io::Error),
}

/// An infinite source of non-empty lines appended to a log.
#[async_trait]
pub trait LineSource: Send {
    /// Returns the next appended line, waiting as long as it takes for one
    /// to arrive. Absence of traffic is the intended idle state, not an
    /// error, so there is no timeout here.
    async fn next_line(&mut self) -> Result<String, TailError>;
}

#[cfg(unix)]
fn inode_of(metadata: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
fn inode_of(_metadata: &std::fs::Metadata) -> u64 {
    0
}

/// Follows a log file by path, tolerating rotation and truncation.
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
    inode: u64,
    poll_interval: Duration,
    pending: VecDeque<String>,
}

impl LogTailer {
    /// Creates a tailer positioned at the current end of the file, so
    /// pre-existing content is not replayed. Fails fast if the file does
    /// not exist.
    pub fn new(path: &Path, poll_interval: Duration) -> Result<Self, TailError> {
        let metadata = std::fs::metadata(path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                TailError::NotFound(path.to_path_buf())
            } else {
                TailError::Io(error)
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            offset: metadata.len(),
            inode: inode_of(&metadata),
            poll_interval,
            pending: VecDeque::new(),
        })
    }

    /// Runs one poll cycle: detect rotation/truncation, then drain any
    /// complete lines appended since the last offset into the pending queue.
    async fn poll_once(&mut self) -> Result<(), std::io::Error> {
        let metadata = tokio::fs::metadata(&self.path).await?;

        let inode = inode_of(&metadata);
        if inode != self.inode {
            tracing::info!(path = %self.path.display(), "Log file rotated, re-reading from start.");
            self.inode = inode;
            self.offset = 0;
        } else if metadata.len() < self.offset {
            tracing::info!(path = %self.path.display(), "Log file truncated, re-reading from start.");
            self.offset = 0;
        }

        if metadata.len() == self.offset {
            return Ok(());
        }

        let file = File::open(&self.path).await?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(self.offset)).await?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).await?;
            if n == 0 {
                break;
            }
            // A chunk without a trailing newline is a partially written
            // line; leave it for the next poll.
            if buf.last() != Some(&b'\n') {
                break;
            }
            self.offset += n as u64;
            let line = String::from_utf8_lossy(&buf).trim().to_string();
            if !line.is_empty() {
                self.pending.push_back(line);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl LineSource for LogTailer {
    async fn next_line(&mut self) -> Result<String, TailError> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(line);
            }

            // Transient errors (e.g. the file is briefly absent mid-rotation)
            // are tolerated and retried on the next poll.
            if let Err(error) = self.poll_once().await {
                tracing::debug!(%error, path = %self.path.display(), "Poll of log file failed, retrying.");
            }

            if self.pending.is_empty() {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }
}
