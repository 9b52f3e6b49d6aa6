//! Documented defaults for run configuration.
//!
//! # Design
//! - Keep every default in one place so the CLI help and the models agree.
//! - Remote store defaults describe the production data lake bucket.

use std::path::{Path, PathBuf};

/// Default AWS region for the object store.
pub const DEFAULT_REGION: &str = "eu-west-2";
/// Default bucket receiving the archives.
pub const DEFAULT_BUCKET: &str = "dfp-datalake-london";
/// Default key prefix inside the bucket.
pub const DEFAULT_BASE_PATH: &str = "dfp/raw/crime/data.police.uk";
/// Default source directory scanned for month directories.
pub const DEFAULT_SOURCE_DIR: &str = ".";
/// Output directory relative to the user's home directory.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "Projects/monthpack-output";
/// Archive file extension (also used in remote keys).
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "zip";
/// Separator between group and unit in directory names (`2019-09`).
pub const DEFAULT_NAME_SEPARATOR: char = '-';

/// Resolve the default output directory beneath `home`.
///
/// Falls back to a relative `monthpack-output` directory when no home directory
/// is known.
#[must_use]
pub fn default_output_dir_in(home: Option<&Path>) -> PathBuf {
    home.map_or_else(
        || PathBuf::from("monthpack-output"),
        |home| home.join(DEFAULT_OUTPUT_SUBDIR),
    )
}

/// Resolve the default output directory for the current user.
#[must_use]
pub fn default_output_dir() -> PathBuf {
    default_output_dir_in(home::home_dir().as_deref())
}
