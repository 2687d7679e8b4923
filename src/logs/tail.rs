//! Adaptive log-tail reader.
//!
//! Returns the last N logical log entries from a file without reading the
//! whole file. The read window starts at 64 KiB and doubles until enough
//! entries are found or the 1 MiB cap is reached, so a fixed window is never
//! too small for quiet logs nor forces a full read of multi-gigabyte files.
//! Entries are split on the PSR-3 timestamp anchor `[YYYY-MM-DD HH:MM:SS]`,
//! keeping multi-line records (stack traces under one timestamped header)
//! attached to their header.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Initial read window in bytes.
pub const CHUNK_SIZE_START: u64 = 64 * 1024;

/// Maximum read window in bytes.
pub const CHUNK_SIZE_MAX: u64 = 1024 * 1024;

/// A line starting a new log entry.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\]").expect("valid timestamp regex")
});

/// A PSR-3 entry tagged at the ERROR level.
static ERROR_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\][^\n]*\.ERROR:")
        .expect("valid error entry regex")
});

/// Runtime crash markers for logs without PSR-3 level tags.
static CRASH_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(fatal error|parse error|panicked at|stack backtrace|segmentation fault)")
        .expect("valid crash marker regex")
});

/// Errors from reading a log file.
#[derive(Debug, Error)]
pub enum LogReadError {
    /// The file does not exist. Distinct from an existing-but-empty file,
    /// which reads as zero entries.
    #[error("log file not found at {path}")]
    NotFound { path: String },

    #[error("failed to read log file: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the last `count` logical entries from a log file.
///
/// Returns fewer entries when the file holds fewer, even at the maximum
/// window; entries come back in original file order.
pub fn read_last_entries(path: &Path, count: usize) -> Result<Vec<String>, LogReadError> {
    let mut chunk_size = CHUNK_SIZE_START;

    loop {
        let entries = scan_chunk(path, chunk_size)?;

        if entries.len() >= count || chunk_size >= CHUNK_SIZE_MAX {
            let skip = entries.len().saturating_sub(count);
            return Ok(entries[skip..].to_vec());
        }

        chunk_size *= 2;
    }
}

/// Scan backward for the most recent entry matching an error signature.
///
/// Grows the window the same way as [`read_last_entries`]; `Ok(None)` means
/// the maximum window held no matching entry.
pub fn read_last_error_entry(path: &Path) -> Result<Option<String>, LogReadError> {
    let mut chunk_size = CHUNK_SIZE_START;

    loop {
        let entries = scan_chunk(path, chunk_size)?;

        if let Some(hit) = entries.iter().rev().find(|entry| is_error_entry(entry)) {
            return Ok(Some(hit.trim().to_string()));
        }

        if chunk_size >= CHUNK_SIZE_MAX {
            return Ok(None);
        }

        chunk_size *= 2;
    }
}

/// Whether an entry matches an error signature: a PSR-3 `.ERROR:` tag right
/// after the timestamp, or a known runtime crash marker.
pub fn is_error_entry(entry: &str) -> bool {
    ERROR_ENTRY_RE.is_match(entry) || CRASH_MARKER_RE.is_match(entry)
}

/// Read the last `chunk_size` bytes of a file and split them into entries.
fn scan_chunk(path: &Path, chunk_size: u64) -> Result<Vec<String>, LogReadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LogReadError::NotFound {
            path: path.display().to_string(),
        },
        _ => LogReadError::Io(e),
    })?;

    let len = file.metadata()?.len();
    let offset = len.saturating_sub(chunk_size);

    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::Start(offset))?;

    if offset > 0 {
        // Started mid-record; the first line may be a truncated fragment.
        let mut discarded = Vec::new();
        reader.read_until(b'\n', &mut discarded)?;
    }

    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    let content = String::from_utf8_lossy(&buf);

    Ok(split_entries(&content))
}

/// Split buffered log content into logical entries.
///
/// An entry begins at every line matching the timestamp pattern; lines
/// before the first timestamp form their own (possibly truncated) entry.
/// When no line carries a timestamp the format is assumed line-oriented and
/// each non-blank line becomes one entry.
fn split_entries(content: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut saw_timestamp = false;

    for line in content.lines() {
        if TIMESTAMP_RE.is_match(line) {
            saw_timestamp = true;
            if !current.trim().is_empty() {
                entries.push(current.trim_end().to_string());
            }
            current.clear();
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        entries.push(current.trim_end().to_string());
    }

    if !saw_timestamp {
        return content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
    }

    entries
}
