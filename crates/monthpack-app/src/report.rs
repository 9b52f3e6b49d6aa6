//! Outcome of one batch run.

use std::fmt;
use std::path::PathBuf;

use monthpack_fsops::PackSummary;
use monthpack_store::UploadedObject;

use crate::error::TaskError;

/// A successfully written archive awaiting (or past) upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResult {
    /// Source directory the archive was built from.
    pub directory: String,
    /// Local archive path.
    pub local_path: PathBuf,
    /// Remote key relative to the store base path.
    pub remote_key: String,
    /// Entry and size counters of the archive.
    pub summary: PackSummary,
}

/// Stage at which a directory task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStage {
    /// Listing the month directory.
    Collect,
    /// Resolving the directory name into group and unit.
    Resolve,
    /// Writing the archive.
    Archive,
    /// Uploading the archive.
    Upload,
}

impl TaskStage {
    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Resolve => "resolve",
            Self::Archive => "archive",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for TaskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directory task that did not complete.
#[derive(Debug)]
pub struct TaskFailure {
    /// Source directory name.
    pub directory: String,
    /// Stage that failed.
    pub stage: TaskStage,
    /// Underlying error.
    pub error: TaskError,
}

/// Why a top-level entry was not packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is not a directory.
    NotADirectory,
    /// The entry name starts with a dot.
    Hidden,
    /// The directory holds no files and empty directories are skipped.
    Empty,
}

impl SkipReason {
    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotADirectory => "not_a_directory",
            Self::Hidden => "hidden",
            Self::Empty => "empty",
        }
    }
}

/// A top-level entry left out of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Entry name.
    pub name: String,
    /// Reason it was skipped.
    pub reason: SkipReason,
}

/// Every per-directory outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Archives written, in completion order.
    pub archived: Vec<ArchiveResult>,
    /// Objects uploaded, in upload order.
    pub uploaded: Vec<UploadedObject>,
    /// Entries skipped during discovery.
    pub skipped: Vec<SkippedEntry>,
    /// Tasks that failed at any stage.
    pub failures: Vec<TaskFailure>,
}

impl RunReport {
    /// Whether every dispatched task succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure recorded for `directory`, if any.
    #[must_use]
    pub fn failure_for(&self, directory: &str) -> Option<&TaskFailure> {
        self.failures
            .iter()
            .find(|failure| failure.directory == directory)
    }

    pub(crate) fn record_failure(
        &mut self,
        directory: impl Into<String>,
        stage: TaskStage,
        error: TaskError,
    ) {
        self.failures.push(TaskFailure {
            directory: directory.into(),
            stage,
            error,
        });
    }

    pub(crate) fn record_skip(&mut self, name: impl Into<String>, reason: SkipReason) {
        self.skipped.push(SkippedEntry {
            name: name.into(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monthpack_fsops::FsOpsError;

    #[test]
    fn report_is_successful_until_a_failure_is_recorded() {
        let mut report = RunReport::default();
        report.record_skip("readme.txt", SkipReason::NotADirectory);
        assert!(report.is_success());

        report.record_failure(
            "notes",
            TaskStage::Resolve,
            TaskError::fsops(FsOpsError::MalformedName {
                name: "notes".to_string(),
                reason: "missing separator",
            }),
        );
        assert!(!report.is_success());
        let failure = report
            .failure_for("notes")
            .map(|failure| failure.stage);
        assert_eq!(failure, Some(TaskStage::Resolve));
        assert_eq!(TaskStage::Upload.to_string(), "upload");
    }
}
