//! Prometheus-backed counters for a batch run.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Counters are labelled by outcome so one registry covers success and failure.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Outcome label recorded for archive and upload tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The task completed.
    Success,
    /// The task failed and was recorded in the run report.
    Failure,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Prometheus-backed metrics registry for one run.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    archive_tasks_total: IntCounterVec,
    upload_tasks_total: IntCounterVec,
    uploaded_bytes_total: IntCounter,
    skipped_entries_total: IntCounter,
}

/// Snapshot of the run counters for end-of-run reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Archives written successfully.
    pub archives_succeeded: u64,
    /// Archive tasks that failed (including name resolution and listing).
    pub archives_failed: u64,
    /// Archives uploaded successfully.
    pub uploads_succeeded: u64,
    /// Uploads that failed.
    pub uploads_failed: u64,
    /// Total bytes sent to the object store.
    pub uploaded_bytes: u64,
    /// Top-level entries skipped during discovery.
    pub skipped_entries: u64,
}

impl Metrics {
    /// Construct a new registry with the run collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let archive_tasks_total = IntCounterVec::new(
            Opts::new(
                "monthpack_archive_tasks_total",
                "Directory tasks finished by outcome, including resolve and collect failures",
            ),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "monthpack_archive_tasks_total",
            source,
        })?;
        let upload_tasks_total = IntCounterVec::new(
            Opts::new(
                "monthpack_upload_tasks_total",
                "Upload tasks finished by outcome",
            ),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "monthpack_upload_tasks_total",
            source,
        })?;
        let uploaded_bytes_total = IntCounter::with_opts(Opts::new(
            "monthpack_uploaded_bytes_total",
            "Bytes sent to the object store",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "monthpack_uploaded_bytes_total",
            source,
        })?;
        let skipped_entries_total = IntCounter::with_opts(Opts::new(
            "monthpack_skipped_entries_total",
            "Top-level source entries skipped during discovery",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "monthpack_skipped_entries_total",
            source,
        })?;

        register(&registry, "monthpack_archive_tasks_total", &archive_tasks_total)?;
        register(&registry, "monthpack_upload_tasks_total", &upload_tasks_total)?;
        register(&registry, "monthpack_uploaded_bytes_total", &uploaded_bytes_total)?;
        register(&registry, "monthpack_skipped_entries_total", &skipped_entries_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                archive_tasks_total,
                upload_tasks_total,
                uploaded_bytes_total,
                skipped_entries_total,
            }),
        })
    }

    /// Record a finished directory task.
    ///
    /// Directories that fail to resolve or collect count as failures here.
    pub fn inc_archive(&self, outcome: Outcome) {
        self.inner
            .archive_tasks_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Record a finished upload and, on success, the bytes sent.
    pub fn inc_upload(&self, outcome: Outcome, bytes: u64) {
        self.inner
            .upload_tasks_total
            .with_label_values(&[outcome.as_str()])
            .inc();
        if outcome == Outcome::Success {
            self.inner.uploaded_bytes_total.inc_by(bytes);
        }
    }

    /// Record a skipped top-level entry.
    pub fn inc_skipped(&self) {
        self.inner.skipped_entries_total.inc();
    }

    /// Capture the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let archive = |outcome: Outcome| {
            self.inner
                .archive_tasks_total
                .with_label_values(&[outcome.as_str()])
                .get()
        };
        let upload = |outcome: Outcome| {
            self.inner
                .upload_tasks_total
                .with_label_values(&[outcome.as_str()])
                .get()
        };
        MetricsSnapshot {
            archives_succeeded: archive(Outcome::Success),
            archives_failed: archive(Outcome::Failure),
            uploads_succeeded: upload(Outcome::Success),
            uploads_failed: upload(Outcome::Failure),
            uploaded_bytes: self.inner.uploaded_bytes_total.get(),
            skipped_entries: self.inner.skipped_entries_total.get(),
        }
    }

    /// Render all metrics in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the output is not UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.inner.registry.gather(), &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
