//! # Design
//!
//! - `AppError` covers failures that stop a run before any task is dispatched.
//! - `TaskError` covers failures scoped to one directory; they are collected
//!   into the run report instead of aborting the batch.
//! - Messages stay constant; context travels in fields.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Fatal application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or was invalid.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: monthpack_config::ConfigError,
    },
    /// Logging or metrics could not be set up.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: monthpack_telemetry::TelemetryError,
    },
    /// The source root could not be listed.
    #[error("source discovery failed")]
    Discovery {
        /// Operation identifier.
        operation: &'static str,
        /// Source fsops error.
        source: monthpack_fsops::FsOpsError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: monthpack_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: monthpack_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn discovery(
        operation: &'static str,
        source: monthpack_fsops::FsOpsError,
    ) -> Self {
        Self::Discovery { operation, source }
    }
}

/// Failure of a single directory task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Name resolution, listing or packing failed.
    #[error("archive task failed")]
    FsOps {
        /// Source fsops error.
        source: monthpack_fsops::FsOpsError,
    },
    /// The archive could not be uploaded.
    #[error("upload task failed")]
    Store {
        /// Source store error.
        source: monthpack_store::StoreError,
    },
    /// The blocking archive task panicked or was cancelled.
    #[error("archive task did not complete")]
    Join {
        /// Source join error.
        source: tokio::task::JoinError,
    },
    /// The archive task could not obtain a concurrency permit.
    #[error("archive task was not scheduled")]
    Scheduling {
        /// Source semaphore error.
        source: tokio::sync::AcquireError,
    },
}

impl TaskError {
    pub(crate) const fn fsops(source: monthpack_fsops::FsOpsError) -> Self {
        Self::FsOps { source }
    }

    pub(crate) const fn store(source: monthpack_store::StoreError) -> Self {
        Self::Store { source }
    }

    pub(crate) const fn join(source: tokio::task::JoinError) -> Self {
        Self::Join { source }
    }

    pub(crate) const fn scheduling(source: tokio::sync::AcquireError) -> Self {
        Self::Scheduling { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "load",
            monthpack_config::ConfigError::InvalidField {
                section: "store",
                field: "bucket",
                value: None,
                reason: "must not be empty",
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert_eq!(config.to_string(), "configuration operation failed");

        let discovery = AppError::discovery(
            "list",
            monthpack_fsops::FsOpsError::InvalidInput {
                field: "source_dir",
                reason: "not a directory",
                value: None,
            },
        );
        assert!(matches!(discovery, AppError::Discovery { .. }));
        assert!(discovery.source().is_some());
    }

    #[test]
    fn task_error_preserves_source() {
        let err = TaskError::fsops(monthpack_fsops::FsOpsError::MalformedName {
            name: "notes".to_string(),
            reason: "missing separator",
        });
        assert_eq!(err.to_string(), "archive task failed");
        assert!(err.source().is_some());
    }
}
