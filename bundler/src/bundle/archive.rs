//! Bundle destinations: an in-memory ZIP archive or a folder on disk

use std::io::{Cursor, Write};
use std::path::{Component, Path};

use async_trait::async_trait;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::BundlerError;
use crate::filesys::dir::Dir;

/// Receives the rendered files of a bundle, one entry at a time
#[async_trait]
pub trait EntrySink: Send {
    /// Store `content` under the archive relative `path`
    async fn put(&mut self, path: &str, content: &str) -> Result<(), BundlerError>;
}

/// Join archive path segments with `/`, skipping empty ones.
pub fn entry_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Deflated ZIP archive built in memory
pub struct ZipSink {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ZipSink {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Write the central directory and return the archive bytes
    pub fn finish(self) -> Result<Vec<u8>, BundlerError> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ZipSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntrySink for ZipSink {
    async fn put(&mut self, path: &str, content: &str) -> Result<(), BundlerError> {
        let archive_error = |reason: String| BundlerError::Archive {
            path: path.to_string(),
            reason,
        };
        self.writer
            .start_file(path, self.options)
            .map_err(|e| archive_error(e.to_string()))?;
        self.writer
            .write_all(content.as_bytes())
            .map_err(|e| archive_error(e.to_string()))?;
        self.entries += 1;
        debug!("Added {} to archive ({} bytes)", path, content.len());
        Ok(())
    }
}

/// Writes each entry to `root/<path>` with a trailing newline
pub struct DiskSink {
    root: Dir,
    written: Vec<String>,
}

impl DiskSink {
    pub fn new(root: Dir) -> Self {
        Self {
            root,
            written: Vec::new(),
        }
    }

    /// Archive relative paths written so far, in order
    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn into_written(self) -> Vec<String> {
        self.written
    }
}

/// Entry paths come from request data and must stay below the root.
pub(crate) fn check_relative(path: &str) -> Result<(), BundlerError> {
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || escapes {
        return Err(BundlerError::InvalidPath(path.to_string()));
    }
    Ok(())
}

#[async_trait]
impl EntrySink for DiskSink {
    async fn put(&mut self, path: &str, content: &str) -> Result<(), BundlerError> {
        check_relative(path)?;
        let file = self.root.file(path);
        file.write_string(&format!("{}\n", content)).await?;
        info!("Saved {}", file.path().display());
        self.written.push(path.to_string());
        Ok(())
    }
}
