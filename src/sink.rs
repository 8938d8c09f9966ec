//! Append-only destinations for downloaded bytes.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// A destination that only grows.
///
/// The resume offset of every request is read from [`Sink::current_len`], so an
/// implementation must report every byte accepted by [`Sink::write_chunk`].
#[async_trait]
pub trait Sink: Send {
    /// Number of bytes held so far.
    async fn current_len(&mut self) -> io::Result<u64>;

    /// Appends `chunk` to the end of the sink.
    async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;
}

/// A local file opened in append mode.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// Existing content is never truncated, which is what lets a later run
    /// pick up where an interrupted one stopped.
    pub async fn open_append(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn current_len(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata().await?.len())
    }

    async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await?;
        // tokio buffers writes; flush so metadata sees them
        self.file.flush().await
    }
}

#[async_trait]
impl Sink for Vec<u8> {
    async fn current_len(&mut self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }

    async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.extend_from_slice(chunk);
        Ok(())
    }
}
