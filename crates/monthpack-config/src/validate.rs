//! Validation for run configuration.

use std::path::MAIN_SEPARATOR;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ArchiveConfig, RunConfig, StoreConfig};

impl RunConfig {
    /// Validate every section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for the first field that fails.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("run", "source_dir", None, "empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("run", "output_dir", None, "empty"));
        }
        validate_archive(&self.archive)?;
        validate_store(&self.store)
    }
}

fn validate_archive(archive: &ArchiveConfig) -> ConfigResult<()> {
    if archive.extension.is_empty() {
        return Err(ConfigError::invalid("archive", "extension", None, "empty"));
    }
    if !archive
        .extension
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric())
    {
        return Err(ConfigError::invalid(
            "archive",
            "extension",
            Some(archive.extension.clone()),
            "must be ascii alphanumeric",
        ));
    }
    if archive.separator == '/' || archive.separator == MAIN_SEPARATOR || archive.separator == '.'
    {
        return Err(ConfigError::invalid(
            "archive",
            "separator",
            Some(archive.separator.to_string()),
            "must not be a path character",
        ));
    }
    Ok(())
}

fn validate_store(store: &StoreConfig) -> ConfigResult<()> {
    if store.bucket.trim().is_empty() {
        return Err(ConfigError::invalid("store", "bucket", None, "empty"));
    }
    if store.region.trim().is_empty() {
        return Err(ConfigError::invalid("store", "region", None, "empty"));
    }
    if let Some(endpoint) = &store.endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "store",
                "endpoint",
                Some(endpoint.clone()),
                "must be an http(s) url",
            ));
        }
    }
    Ok(())
}
