//! Line-oriented record sources
//!
//! Every input of the system (census exports, station lists, the observation
//! file) is consumed as a lazy, finite, restartable sequence of text rows.
//! Column decoding is left to the consumer.

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lazy sequence of rows produced by one pass over a source
pub type SourceLines<'a> = Box<dyn Iterator<Item = Result<String>> + Send + 'a>;

/// A named, restartable source of text rows
pub trait RecordSource: Send + Sync {
    /// Name used in log lines and error messages
    fn name(&self) -> &str;

    /// Start a new pass over the rows
    ///
    /// The underlying resource stays open until the returned iterator is dropped.
    fn lines(&self) -> Result<SourceLines<'_>>;
}

/// Check that an input path exists, is a regular file and can be opened
pub fn validate_input(path: &Path) -> Result<()> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(Error::validation(display, "file does not exist"));
    }

    if !path.is_file() {
        return Err(Error::validation(display, "not a regular file"));
    }

    File::open(path).map_err(|e| Error::validation(display, format!("unreadable: {}", e)))?;

    Ok(())
}

// =============================================================================
// File Source
// =============================================================================

/// Rows of a text file on disk
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the row.
#[derive(Debug, Clone)]
pub struct FileLineSource {
    path: PathBuf,
    name: String,
}

impl FileLineSource {
    /// Create a source over a validated file
    ///
    /// # Errors
    /// Returns `Error::Validation` when the path is missing, not a regular
    /// file, or unreadable.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        validate_input(&path)?;
        let name = path.display().to_string();
        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileLineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn lines(&self) -> Result<SourceLines<'_>> {
        let file = File::open(&self.path)
            .map_err(|e| Error::io(format!("Failed to open {}", self.name), e))?;
        debug!("Opened {}", self.name);

        Ok(Box::new(FileLines {
            reader: BufReader::new(file),
            name: &self.name,
            buffer: Vec::new(),
            lines_read: 0,
            failed: false,
        }))
    }
}

struct FileLines<'a> {
    reader: BufReader<File>,
    name: &'a str,
    buffer: Vec<u8>,
    lines_read: usize,
    failed: bool,
}

impl Iterator for FileLines<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.lines_read += 1;
                let line = String::from_utf8_lossy(&self.buffer);
                Some(Ok(line.trim_end_matches(['\r', '\n']).to_string()))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(Error::io(
                    format!("Failed reading {} after {} lines", self.name, self.lines_read),
                    e,
                )))
            }
        }
    }
}

impl Drop for FileLines<'_> {
    fn drop(&mut self) {
        debug!("Closed {} after {} lines", self.name, self.lines_read);
    }
}

// =============================================================================
// In-Memory Source
// =============================================================================

/// Rows held in memory, mainly for tests and benchmarks
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    rows: Vec<String>,
}

impl InMemorySource {
    pub fn new<I, S>(name: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RecordSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn lines(&self) -> Result<SourceLines<'_>> {
        Ok(Box::new(self.rows.iter().cloned().map(Ok)))
    }
}
