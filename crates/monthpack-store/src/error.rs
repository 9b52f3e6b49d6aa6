//! # Design
//!
//! - Split local read failures from remote transport failures.
//! - Keep messages constant; keys, paths and remote detail travel as fields.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed transport error from the remote client.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced while uploading archives.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the local archive failed.
    #[error("store io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Local path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The remote store rejected the request or could not be reached.
    #[error("store transport failure")]
    Transport {
        /// Operation that triggered the transport failure.
        operation: &'static str,
        /// Object key of the failed request.
        key: String,
        /// Flattened remote error chain for logs.
        detail: String,
        /// Underlying client error.
        source: BoxError,
    },
    /// The request could not be expressed for the remote store.
    #[error("store invalid request")]
    InvalidRequest {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Object key of the request.
        key: String,
    },
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transport(
        operation: &'static str,
        key: impl Into<String>,
        detail: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transport {
            operation,
            key: key.into(),
            detail: detail.into(),
            source: source.into(),
        }
    }

    /// Whether the failure happened on the remote side rather than locally.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
