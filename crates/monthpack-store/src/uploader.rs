//! Sends a local archive to the object store with the required metadata.
//!
//! # Design
//! - The whole archive is read into memory before the transfer; one month of
//!   records fits comfortably, arbitrarily large archives do not.
//! - Bucket and key prefix come from the `StoreConfig` given at construction.

use std::path::Path;

use monthpack_config::StoreConfig;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::sink::{CannedAcl, Encryption, ObjectSink, PutObjectRequest};
use crate::sniff::detect_content_type;

const CONTENT_DISPOSITION: &str = "attachment";

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    /// Bucket holding the object.
    pub bucket: String,
    /// Full object key including the base path.
    pub key: String,
    /// Payload size in bytes.
    pub bytes: u64,
    /// Content type sent with the object.
    pub content_type: String,
    /// Entity tag reported by the store.
    pub e_tag: Option<String>,
}

/// Uploads archives through an [`ObjectSink`].
pub struct Uploader<S> {
    sink: S,
    config: StoreConfig,
}

impl<S: ObjectSink> Uploader<S> {
    /// Build an uploader writing through `sink` with the given store settings.
    #[must_use]
    pub const fn new(sink: S, config: StoreConfig) -> Self {
        Self { sink, config }
    }

    /// Store settings in use.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Upload the archive at `local_path` under `<base_path>/<relative_key>`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the archive cannot be read and
    /// [`StoreError::Transport`] when the store rejects the request.
    pub async fn upload(&self, local_path: &Path, relative_key: &str) -> StoreResult<UploadedObject> {
        let key = self.config.object_key(relative_key);
        if key.is_empty() {
            return Err(StoreError::InvalidRequest {
                field: "key",
                reason: "empty object key",
                key,
            });
        }

        let body = tokio::fs::read(local_path)
            .await
            .map_err(|err| StoreError::io("upload.read_archive", local_path, err))?;
        let bytes = body.len() as u64;
        let content_type = detect_content_type(&body).to_string();
        debug!(
            path = %local_path.display(),
            key = %key,
            bytes,
            content_type = %content_type,
            "sending archive"
        );

        let receipt = self
            .sink
            .put_object(PutObjectRequest {
                bucket: self.config.bucket.clone(),
                key: key.clone(),
                body,
                content_type: content_type.clone(),
                content_disposition: CONTENT_DISPOSITION.to_string(),
                acl: CannedAcl::Private,
                encryption: Encryption::Aes256,
            })
            .await?;

        info!(bucket = %self.config.bucket, key = %key, bytes, "archive uploaded");
        Ok(UploadedObject {
            bucket: self.config.bucket.clone(),
            key,
            bytes,
            content_type,
            e_tag: receipt.e_tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySink;
    use anyhow::Result;
    use std::fs;

    fn store_config() -> StoreConfig {
        StoreConfig {
            bucket: "test-bucket".to_string(),
            base_path: "lake/raw".to_string(),
            ..StoreConfig::default()
        }
    }

    #[tokio::test]
    async fn upload_sets_metadata_and_full_key() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let archive = dir.path().join("05.zip");
        fs::write(&archive, b"PK\x03\x04payload")?;

        let uploader = Uploader::new(MemorySink::new(), store_config());
        let uploaded = uploader.upload(&archive, "2020/05.zip").await?;
        assert_eq!(uploaded.key, "lake/raw/2020/05.zip");
        assert_eq!(uploaded.bucket, "test-bucket");
        assert_eq!(uploaded.bytes, 11);
        assert_eq!(uploaded.content_type, "application/zip");

        let stored = uploader
            .sink()
            .object("lake/raw/2020/05.zip")
            .ok_or_else(|| anyhow::anyhow!("object missing"))?;
        assert_eq!(stored.body, b"PK\x03\x04payload");
        assert_eq!(stored.acl, CannedAcl::Private);
        assert_eq!(stored.encryption, Encryption::Aes256);
        assert_eq!(stored.content_disposition, "attachment");
        Ok(())
    }

    #[tokio::test]
    async fn missing_archive_is_an_io_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let uploader = Uploader::new(MemorySink::new(), store_config());
        let err = uploader
            .upload(&dir.path().join("absent.zip"), "2020/05.zip")
            .await
            .expect_err("missing archive must fail");
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(uploader.sink().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejected_key_is_a_transport_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let archive = dir.path().join("06.zip");
        fs::write(&archive, b"PK\x03\x04")?;

        let sink = MemorySink::new();
        sink.reject_key("lake/raw/2020/06.zip");
        let uploader = Uploader::new(sink, store_config());
        let err = uploader
            .upload(&archive, "2020/06.zip")
            .await
            .expect_err("rejected key must fail");
        assert!(err.is_transport());
        Ok(())
    }
}
