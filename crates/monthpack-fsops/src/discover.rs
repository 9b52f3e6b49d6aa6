//! One-level discovery of month directories under a source root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FsOpsError, FsOpsResult};

/// Kind of a top-level source entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory); skipped.
    File,
    /// Directory eligible for packing.
    Directory,
}

/// An entry found directly under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// File name of the entry.
    pub name: String,
    /// Full path of the entry.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub kind: EntryKind,
}

impl SourceEntry {
    /// Whether the entry name starts with a dot.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Payload files found inside one month directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    /// Name of the month directory.
    pub name: String,
    /// Full path of the month directory.
    pub path: PathBuf,
    /// Files directly inside the directory, sorted by file name.
    pub files: Vec<PathBuf>,
}

impl MonthGroup {
    /// Whether the directory held no payload files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// List the immediate entries of `source`, sorted by name.
///
/// Symlinks are followed so a linked month directory counts as a directory.
///
/// # Errors
///
/// Returns an error if `source` is not a readable directory or any entry
/// cannot be inspected.
pub fn list_entries(source: &Path) -> FsOpsResult<Vec<SourceEntry>> {
    let metadata =
        fs::metadata(source).map_err(|err| FsOpsError::io("discover.stat_source", source, err))?;
    if !metadata.is_dir() {
        return Err(FsOpsError::InvalidInput {
            field: "source_dir",
            reason: "not a directory",
            value: Some(source.display().to_string()),
        });
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| FsOpsError::walkdir("discover.list_source", source, err))?;
        let kind = if entry.file_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(SourceEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
            kind,
        });
    }
    Ok(entries)
}

/// Collect the files directly inside a month directory.
///
/// Nested directories are not recursed into and are left out of the group.
/// Symlinks are kept as payload and resolved when the archive is written.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn collect_group(entry: &SourceEntry) -> FsOpsResult<MonthGroup> {
    let mut files = Vec::new();
    for child in WalkDir::new(&entry.path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let child =
            child.map_err(|err| FsOpsError::walkdir("discover.list_month", &entry.path, err))?;
        if child.file_type().is_dir() {
            debug!(
                directory = %entry.name,
                nested = %child.path().display(),
                "skipping nested directory"
            );
            continue;
        }
        files.push(child.into_path());
    }
    Ok(MonthGroup {
        name: entry.name.clone(),
        path: entry.path.clone(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use monthpack_test_support::fixtures::MonthTree;

    #[test]
    fn lists_directories_and_files_sorted() -> Result<()> {
        let tree = MonthTree::new()?;
        tree.month("2019-02", &[("b.csv", b"b")])?;
        tree.month("2019-01", &[("a.csv", b"a")])?;
        tree.top_level_file("README.txt", b"notes")?;

        let entries = list_entries(&tree.source())?;
        let summary: Vec<_> = entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("2019-01", EntryKind::Directory),
                ("2019-02", EntryKind::Directory),
                ("README.txt", EntryKind::File),
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_source_is_an_error() -> Result<()> {
        let tree = MonthTree::new()?;
        let err = list_entries(&tree.root().join("absent")).expect_err("missing source");
        assert!(matches!(err, FsOpsError::Io { .. }));
        Ok(())
    }

    #[test]
    fn file_source_is_rejected() -> Result<()> {
        let tree = MonthTree::new()?;
        let file = tree.top_level_file("plain.txt", b"x")?;
        let err = list_entries(&file).expect_err("file source");
        assert!(matches!(err, FsOpsError::InvalidInput { field: "source_dir", .. }));
        Ok(())
    }

    #[test]
    fn group_skips_nested_directories() -> Result<()> {
        let tree = MonthTree::new()?;
        let dir = tree.month("2020-05", &[("b.csv", b"b"), ("a.csv", b"a")])?;
        fs::create_dir_all(dir.join("nested"))?;
        fs::write(dir.join("nested").join("deep.csv"), b"deep")?;

        let entry = SourceEntry {
            name: "2020-05".to_string(),
            path: dir.clone(),
            kind: EntryKind::Directory,
        };
        let group = collect_group(&entry)?;
        assert_eq!(group.files, vec![dir.join("a.csv"), dir.join("b.csv")]);
        assert!(!group.is_empty());
        Ok(())
    }

    #[test]
    fn empty_directory_yields_empty_group() -> Result<()> {
        let tree = MonthTree::new()?;
        let dir = tree.month("2021-01", &[])?;
        let entry = SourceEntry {
            name: "2021-01".to_string(),
            path: dir,
            kind: EntryKind::Directory,
        };
        assert!(collect_group(&entry)?.is_empty());
        Ok(())
    }

    #[test]
    fn hidden_entries_are_flagged() {
        let entry = SourceEntry {
            name: ".git".to_string(),
            path: PathBuf::from(".git"),
            kind: EntryKind::Directory,
        };
        assert!(entry.is_hidden());
    }
}
