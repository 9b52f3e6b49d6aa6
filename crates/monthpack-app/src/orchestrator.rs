//! Batch orchestrator: discover month directories, pack them concurrently,
//! then upload the archives one at a time.
//!
//! # Design
//! - Discovery is synchronous and cheap; a failure to list the source root is
//!   the only fatal error of a run.
//! - Every archive task runs on the blocking pool. All tasks are joined before
//!   the first upload starts.
//! - Per-directory failures are recorded in the [`RunReport`] and never cancel
//!   sibling tasks.

use std::path::PathBuf;
use std::sync::Arc;

use monthpack_config::{ArchiveConfig, RunConfig};
use monthpack_fsops::{
    ArchiveLayout, ArchiveTask, Archiver, EntryKind, FsOpsError, PackSummary, collect_group,
    list_entries, resolve_entry,
};
use monthpack_store::{ObjectSink, Uploader};
use monthpack_telemetry::{Metrics, Outcome};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, TaskError};
use crate::report::{ArchiveResult, RunReport, SkipReason, TaskStage};

/// Directory name recorded when a task is lost before it can report its own.
const UNKNOWN_DIRECTORY: &str = "<unknown>";

type ArchiveOutcome = (ArchiveTarget, Result<PackSummary, TaskError>);

#[derive(Debug)]
struct ArchiveTarget {
    directory: String,
    local_path: PathBuf,
    remote_key: String,
}

/// Drives one batch run against an object sink.
pub struct Orchestrator<S> {
    source_dir: PathBuf,
    layout: ArchiveLayout,
    policy: ArchiveConfig,
    archiver: Archiver,
    uploader: Uploader<S>,
    metrics: Metrics,
}

impl<S: ObjectSink> Orchestrator<S> {
    /// Build an orchestrator for `config` writing through `sink`.
    #[must_use]
    pub fn new(config: &RunConfig, sink: S, metrics: Metrics) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            layout: ArchiveLayout::from_config(&config.output_dir, &config.archive),
            policy: config.archive.clone(),
            archiver: Archiver::new(config.archive.entry_naming),
            uploader: Uploader::new(sink, config.store.clone()),
            metrics,
        }
    }

    /// Uploader used for the upload stage.
    #[must_use]
    pub const fn uploader(&self) -> &Uploader<S> {
        &self.uploader
    }

    /// Run discovery, archiving and uploading to completion.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Discovery`] when the source root cannot be listed.
    /// Every other failure is recorded in the returned report.
    pub async fn run(&self) -> AppResult<RunReport> {
        let mut report = RunReport::default();
        let tasks = self.discover(&mut report)?;
        info!(
            source = %self.source_dir.display(),
            tasks = tasks.len(),
            skipped = report.skipped.len(),
            "discovery complete"
        );

        let completed = self.archive_all(tasks, &mut report).await;
        info!(
            archived = completed.len(),
            failed = report.failures.len(),
            "archiving complete"
        );

        self.upload_all(completed, &mut report).await;
        Ok(report)
    }

    fn discover(&self, report: &mut RunReport) -> AppResult<Vec<ArchiveTask>> {
        let entries = list_entries(&self.source_dir)
            .map_err(|source| AppError::discovery("orchestrator.list_source", source))?;

        let mut tasks = Vec::new();
        for entry in entries {
            if self.policy.skip_hidden && entry.is_hidden() {
                self.skip(report, entry.name, SkipReason::Hidden);
                continue;
            }
            if entry.kind == EntryKind::File {
                self.skip(report, entry.name, SkipReason::NotADirectory);
                continue;
            }

            let name = match resolve_entry(&entry, self.policy.separator) {
                Ok(name) => name,
                Err(err) => {
                    self.fail_archive(report, entry.name, TaskStage::Resolve, err);
                    continue;
                }
            };
            let group = match collect_group(&entry) {
                Ok(group) => group,
                Err(err) => {
                    self.fail_archive(report, entry.name, TaskStage::Collect, err);
                    continue;
                }
            };
            if group.is_empty() && self.policy.skip_empty {
                self.skip(report, entry.name, SkipReason::Empty);
                continue;
            }

            debug!(
                directory = %entry.name,
                month = %name,
                files = group.files.len(),
                "planned archive task"
            );
            tasks.push(self.layout.plan(&name, group));
        }
        Ok(tasks)
    }

    async fn archive_all(
        &self,
        tasks: Vec<ArchiveTask>,
        report: &mut RunReport,
    ) -> Vec<ArchiveResult> {
        let limiter = self
            .policy
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.get())));

        let mut running: JoinSet<ArchiveOutcome> = JoinSet::new();
        for task in tasks {
            running.spawn(run_archive_task(self.archiver, task, limiter.clone()));
        }

        let mut completed = Vec::new();
        while let Some(joined) = running.join_next().await {
            let (target, outcome) = match joined {
                Ok(result) => result,
                Err(err) => {
                    warn!(error = %err, "archive task lost");
                    self.metrics.inc_archive(Outcome::Failure);
                    report.record_failure(
                        UNKNOWN_DIRECTORY,
                        TaskStage::Archive,
                        TaskError::join(err),
                    );
                    continue;
                }
            };

            match outcome {
                Ok(summary) => {
                    self.metrics.inc_archive(Outcome::Success);
                    info!(
                        directory = %target.directory,
                        path = %target.local_path.display(),
                        entries = summary.entries,
                        bytes = summary.archive_bytes,
                        "archive written"
                    );
                    let result = ArchiveResult {
                        directory: target.directory,
                        local_path: target.local_path,
                        remote_key: target.remote_key,
                        summary,
                    };
                    report.archived.push(result.clone());
                    completed.push(result);
                }
                Err(err) => {
                    self.metrics.inc_archive(Outcome::Failure);
                    warn!(
                        directory = %target.directory,
                        path = %target.local_path.display(),
                        error = %err,
                        "archive task failed"
                    );
                    report.record_failure(target.directory, TaskStage::Archive, err);
                }
            }
        }
        completed
    }

    async fn upload_all(&self, completed: Vec<ArchiveResult>, report: &mut RunReport) {
        for archive in completed {
            match self
                .uploader
                .upload(&archive.local_path, &archive.remote_key)
                .await
            {
                Ok(uploaded) => {
                    self.metrics.inc_upload(Outcome::Success, uploaded.bytes);
                    report.uploaded.push(uploaded);
                }
                Err(err) => {
                    self.metrics.inc_upload(Outcome::Failure, 0);
                    warn!(
                        directory = %archive.directory,
                        key = %archive.remote_key,
                        error = %err,
                        "upload failed"
                    );
                    report.record_failure(
                        archive.directory,
                        TaskStage::Upload,
                        TaskError::store(err),
                    );
                }
            }
        }
    }

    fn skip(&self, report: &mut RunReport, name: String, reason: SkipReason) {
        debug!(entry = %name, reason = reason.as_str(), "skipping source entry");
        self.metrics.inc_skipped();
        report.record_skip(name, reason);
    }

    /// Resolve and collect failures count as failed archive tasks.
    fn fail_archive(
        &self,
        report: &mut RunReport,
        directory: String,
        stage: TaskStage,
        err: FsOpsError,
    ) {
        warn!(
            directory = %directory,
            stage = %stage,
            error = %err,
            "directory task failed"
        );
        self.metrics.inc_archive(Outcome::Failure);
        report.record_failure(directory, stage, TaskError::fsops(err));
    }
}

async fn run_archive_task(
    archiver: Archiver,
    task: ArchiveTask,
    limiter: Option<Arc<Semaphore>>,
) -> ArchiveOutcome {
    let ArchiveTask {
        source_name,
        output_path,
        remote_key,
        inputs,
    } = task;
    let target = ArchiveTarget {
        directory: source_name,
        local_path: output_path.clone(),
        remote_key,
    };

    let _permit = match limiter {
        Some(semaphore) => match semaphore.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(err) => return (target, Err(TaskError::scheduling(err))),
        },
        None => None,
    };

    let packed = tokio::task::spawn_blocking(move || archiver.pack(&output_path, &inputs)).await;
    let outcome = match packed {
        Ok(Ok(summary)) => Ok(summary),
        Ok(Err(err)) => Err(TaskError::fsops(err)),
        Err(err) => Err(TaskError::join(err)),
    };
    (target, outcome)
}
