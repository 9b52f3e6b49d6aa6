//! Typed configuration models for a monthpack run.
//!
//! # Design
//! - Pure data carriers; IO lives in `loader.rs`, checks in `validate.rs`.
//! - Every struct deserialises from a partial document, missing fields take the
//!   documented defaults.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_ARCHIVE_EXTENSION, DEFAULT_BASE_PATH, DEFAULT_BUCKET, DEFAULT_NAME_SEPARATOR,
    DEFAULT_REGION, DEFAULT_SOURCE_DIR, default_output_dir,
};

/// Complete configuration for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory whose immediate sub-directories are packed.
    pub source_dir: PathBuf,
    /// Root under which `<group>/<unit>.<ext>` archives are written.
    pub output_dir: PathBuf,
    /// Archive layout and discovery policy.
    pub archive: ArchiveConfig,
    /// Remote object store settings.
    pub store: StoreConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: default_output_dir(),
            archive: ArchiveConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// How entries are named inside a produced archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryNaming {
    /// Only the file name (`a.csv`).
    #[default]
    BaseName,
    /// The month directory followed by the file name (`2020-05/a.csv`).
    WithParent,
}

impl EntryNaming {
    /// Stable label used in logs and configuration documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseName => "base_name",
            Self::WithParent => "with_parent",
        }
    }
}

/// Archive layout and discovery policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// File extension of produced archives, without the dot.
    pub extension: String,
    /// Separator between group and unit in directory names.
    pub separator: char,
    /// Entry naming inside each archive.
    pub entry_naming: EntryNaming,
    /// Skip empty month directories instead of writing zero-entry archives.
    pub skip_empty: bool,
    /// Skip top-level entries whose name starts with a dot.
    pub skip_hidden: bool,
    /// Upper bound on concurrent archive tasks; `None` runs one per directory.
    pub max_concurrency: Option<NonZeroUsize>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            separator: DEFAULT_NAME_SEPARATOR,
            entry_naming: EntryNaming::default(),
            skip_empty: false,
            skip_hidden: true,
            max_concurrency: None,
        }
    }
}

/// Remote object store settings, passed to the uploader at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// AWS region of the bucket.
    pub region: String,
    /// Destination bucket.
    pub bucket: String,
    /// Key prefix prepended to every `<group>/<unit>.<ext>` key.
    pub base_path: String,
    /// Custom endpoint URL (S3-compatible stores, `LocalStack`).
    pub endpoint: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            endpoint: None,
        }
    }
}

impl StoreConfig {
    /// Build the full object key for a relative `<group>/<unit>.<ext>` key.
    #[must_use]
    pub fn object_key(&self, relative_key: &str) -> String {
        let base = self.base_path.trim_matches('/');
        let relative = relative_key.trim_start_matches('/');
        if base.is_empty() {
            relative.to_string()
        } else {
            format!("{base}/{relative}")
        }
    }
}
