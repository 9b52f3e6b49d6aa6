//! Directory name resolution and destination naming.
//!
//! # Design
//! - Pure functions only: tests assert exact strings without touching disk.
//! - A directory name maps to exactly one local path and one remote key.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use monthpack_config::{ArchiveConfig, defaults::DEFAULT_NAME_SEPARATOR};

use crate::discover::{MonthGroup, SourceEntry};
use crate::error::{FsOpsError, FsOpsResult};

/// The `(group, unit)` pair parsed from a dated directory name (`2019-09`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthName {
    /// Leading component, typically the year.
    pub group: String,
    /// Trailing component, typically the month.
    pub unit: String,
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.unit)
    }
}

/// Resolve a directory name using the default `-` separator.
///
/// # Errors
///
/// Returns [`FsOpsError::MalformedName`] when the name does not split into two
/// usable components.
pub fn resolve(name: &str) -> FsOpsResult<MonthName> {
    resolve_with(name, DEFAULT_NAME_SEPARATOR)
}

/// Resolve a directory name by splitting on the first `separator`.
///
/// Everything after the first separator is the unit, so `2019-09-b` resolves to
/// `("2019", "09-b")` and never collides with `2019-09-a`.
///
/// # Errors
///
/// Returns [`FsOpsError::MalformedName`] when the separator is absent, either
/// side is empty, or either side would escape its key prefix.
pub fn resolve_with(name: &str, separator: char) -> FsOpsResult<MonthName> {
    let Some((group, unit)) = name.split_once(separator) else {
        return Err(FsOpsError::malformed(name, "missing separator"));
    };
    if group.is_empty() || unit.is_empty() {
        return Err(FsOpsError::malformed(name, "empty component"));
    }
    for part in [group, unit] {
        if part == "." || part == ".." || part.contains(['/', '\\']) {
            return Err(FsOpsError::malformed(name, "component is not a plain name"));
        }
    }
    Ok(MonthName {
        group: group.to_string(),
        unit: unit.to_string(),
    })
}

/// Resolve a discovered entry from its on-disk file name.
///
/// `SourceEntry::name` is lossy; the raw file name from `path` is resolved
/// instead, and names that are not UTF-8 are rejected.
///
/// # Errors
///
/// Returns [`FsOpsError::MalformedName`] when the file name is not valid UTF-8
/// or does not resolve with [`resolve_with`].
pub fn resolve_entry(entry: &SourceEntry, separator: char) -> FsOpsResult<MonthName> {
    let name = entry
        .path
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| FsOpsError::malformed(&entry.name, "not valid utf-8"))?;
    resolve_with(name, separator)
}

/// Maps resolved names to local archive paths and relative remote keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    output_root: PathBuf,
    extension: String,
}

impl ArchiveLayout {
    /// Build a layout rooted at `output_root` producing `.<extension>` files.
    #[must_use]
    pub fn new(output_root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            extension: extension.into(),
        }
    }

    /// Build a layout from the archive section of the run configuration.
    #[must_use]
    pub fn from_config(output_root: impl Into<PathBuf>, config: &ArchiveConfig) -> Self {
        Self::new(output_root, config.extension.clone())
    }

    /// Root directory that receives all archives.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Remote key relative to the store base path: `<group>/<unit>.<ext>`.
    #[must_use]
    pub fn relative_key(&self, name: &MonthName) -> String {
        format!("{}/{}.{}", name.group, name.unit, self.extension)
    }

    /// Local archive path: `<output_root>/<group>/<unit>.<ext>`.
    #[must_use]
    pub fn local_path(&self, name: &MonthName) -> PathBuf {
        self.output_root
            .join(&name.group)
            .join(format!("{}.{}", name.unit, self.extension))
    }

    /// Plan the archive task for a discovered month group.
    #[must_use]
    pub fn plan(&self, name: &MonthName, group: MonthGroup) -> ArchiveTask {
        ArchiveTask {
            output_path: self.local_path(name),
            remote_key: self.relative_key(name),
            source_name: group.name,
            inputs: group.files,
        }
    }
}

/// One unit of archiving work derived from a month group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTask {
    /// Name of the source directory the task was built from.
    pub source_name: String,
    /// Local archive path.
    pub output_path: PathBuf,
    /// Remote key relative to the store base path.
    pub remote_key: String,
    /// Files packed into the archive, in listing order.
    pub inputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::EntryKind;

    fn name(group: &str, unit: &str) -> MonthName {
        MonthName {
            group: group.to_string(),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn resolves_year_month() -> FsOpsResult<()> {
        assert_eq!(resolve("2019-09")?, name("2019", "09"));
        assert_eq!(resolve("2020-12")?, name("2020", "12"));
        Ok(())
    }

    #[test]
    fn keeps_trailing_segments_in_unit() -> FsOpsResult<()> {
        assert_eq!(resolve("2019-09-b")?, name("2019", "09-b"));
        Ok(())
    }

    #[test]
    fn custom_separator() -> FsOpsResult<()> {
        assert_eq!(resolve_with("2019_09", '_')?, name("2019", "09"));
        assert!(resolve_with("2019-09", '_').is_err());
        Ok(())
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["notes", "201909", "-05", "2019-", "-", "", "..-05", "2019-..", "a\\b-01"] {
            let err = resolve(bad).expect_err(bad);
            assert!(
                matches!(err, FsOpsError::MalformedName { ref name, .. } if name == bad),
                "unexpected error for {bad:?}: {err:?}"
            );
        }
    }

    #[test]
    fn entry_resolves_from_its_file_name() -> FsOpsResult<()> {
        let entry = SourceEntry {
            name: "2020-05".to_string(),
            path: PathBuf::from("/src/2020-05"),
            kind: EntryKind::Directory,
        };
        assert_eq!(resolve_entry(&entry, '-')?, name("2020", "05"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_entries_are_malformed() {
        use std::os::unix::ffi::OsStrExt;

        for raw in [&b"2020-\xff"[..], &b"2020-\xfe"[..]] {
            let entry = SourceEntry {
                name: String::from_utf8_lossy(raw).into_owned(),
                path: Path::new("/src").join(OsStr::from_bytes(raw)),
                kind: EntryKind::Directory,
            };
            let err = resolve_entry(&entry, '-').expect_err("non-utf8 name");
            assert!(matches!(
                err,
                FsOpsError::MalformedName {
                    reason: "not valid utf-8",
                    ..
                }
            ));
        }
    }

    #[test]
    fn layout_builds_key_and_path() {
        let layout = ArchiveLayout::new("/srv/out", "zip");
        let month = name("2020", "05");
        assert_eq!(layout.relative_key(&month), "2020/05.zip");
        assert_eq!(layout.local_path(&month), PathBuf::from("/srv/out/2020/05.zip"));
        assert_eq!(month.to_string(), "2020/05");
    }

    #[test]
    fn plan_is_deterministic() {
        let layout = ArchiveLayout::from_config("/out", &ArchiveConfig::default());
        let group = MonthGroup {
            name: "2019-01".to_string(),
            path: PathBuf::from("/src/2019-01"),
            files: vec![PathBuf::from("/src/2019-01/a.csv")],
        };
        let month = name("2019", "01");
        let first = layout.plan(&month, group.clone());
        let second = layout.plan(&month, group);
        assert_eq!(first, second);
        assert_eq!(first.remote_key, "2019/01.zip");
        assert_eq!(first.output_path, PathBuf::from("/out/2019/01.zip"));
        assert_eq!(first.source_name, "2019-01");
    }
}
