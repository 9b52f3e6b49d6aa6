//! Build dated source trees on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// A scratch workspace holding a `source/` tree and an `output/` root.
pub struct MonthTree {
    temp: TempDir,
}

impl MonthTree {
    /// Create an empty workspace with `source/` and `output/` directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directories cannot be created.
    pub fn new() -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix("monthpack-")
            .tempdir()
            .context("failed to create scratch directory")?;
        fs::create_dir_all(temp.path().join("source"))?;
        fs::create_dir_all(temp.path().join("output"))?;
        Ok(Self { temp })
    }

    /// Root of the scratch workspace.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Directory scanned for month directories.
    #[must_use]
    pub fn source(&self) -> PathBuf {
        self.temp.path().join("source")
    }

    /// Output root for produced archives.
    #[must_use]
    pub fn output(&self) -> PathBuf {
        self.temp.path().join("output")
    }

    /// Create a month directory with the given files and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory or file cannot be written.
    pub fn month(&self, name: &str, files: &[(&str, &[u8])]) -> Result<PathBuf> {
        let dir = self.source().join(name);
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        for (file, contents) in files {
            let path = dir.join(file);
            fs::write(&path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        Ok(dir)
    }

    /// Write a regular file directly under the source root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn top_level_file(&self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.source().join(name);
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Create a dangling symlink inside a month directory; opening it fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the month directory or the link cannot be created.
    #[cfg(unix)]
    pub fn broken_link(&self, month: &str, name: &str) -> Result<PathBuf> {
        let dir = self.source().join(month);
        fs::create_dir_all(&dir)?;
        let link = dir.join(name);
        std::os::unix::fs::symlink(self.root().join("does-not-exist"), &link)
            .with_context(|| format!("failed to create symlink {}", link.display()))?;
        Ok(link)
    }
}
