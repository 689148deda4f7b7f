//! Clipboard export targets and the long date used in exported headers.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Long US-style date, e.g. `Monday, October 19, 2026`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Destination for copied text blobs
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Writes copied text to standard output
#[derive(Debug, Default)]
pub struct StdoutClipboard;

impl ClipboardSink for StdoutClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}").context("Failed to write clipboard text to stdout")?;
        stdout.flush().context("Failed to flush stdout")
    }
}

/// Replaces a file with the copied text
///
/// The text is written to a temporary file in the same directory and then
/// renamed over the target, so readers never see a partial export.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardSink for FileClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp_file = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        temp_file
            .write_all(text.as_bytes())
            .context("Failed to write clipboard text")?;
        temp_file
            .persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        log::info!("Copied {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }
}

impl<S: ClipboardSink + ?Sized> ClipboardSink for Box<S> {
    fn copy(&mut self, text: &str) -> Result<()> {
        (**self).copy(text)
    }
}
