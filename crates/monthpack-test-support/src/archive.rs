//! Read produced archives back for assertions.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use zip::{CompressionMethod, ZipArchive};

/// One entry read back from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEntry {
    /// Extracted bytes.
    pub contents: Vec<u8>,
    /// Compression method recorded for the entry.
    pub method: CompressionMethod,
}

/// Read every entry of a zip archive keyed by entry name.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or decoded.
pub fn read_entries(path: &Path) -> Result<BTreeMap<String, ReadEntry>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut archive =
        ZipArchive::new(file).with_context(|| format!("failed to decode {}", path.display()))?;
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        entries.insert(
            entry.name().to_string(),
            ReadEntry {
                contents,
                method: entry.compression(),
            },
        );
    }
    Ok(entries)
}

/// Read archive bytes that are held in memory (for uploaded payloads).
///
/// # Errors
///
/// Returns an error if the bytes are not a valid zip archive.
pub fn read_entries_from_bytes(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes))
        .context("failed to decode in-memory archive")?;
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        entries.insert(entry.name().to_string(), contents);
    }
    Ok(entries)
}
