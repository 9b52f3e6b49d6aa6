//! AWS S3 sink.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{ObjectCannedAcl, ServerSideEncryption};
use monthpack_config::StoreConfig;

use crate::error::{StoreError, StoreResult};
use crate::sink::{CannedAcl, Encryption, ObjectSink, PutObjectReceipt, PutObjectRequest};

/// Create an S3 client for the configured region and optional endpoint.
///
/// Credentials come from the SDK default provider chain (environment, profile,
/// instance metadata).
pub async fn create_s3_client(config: &StoreConfig) -> Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    // Custom endpoints (LocalStack, MinIO) need path-style addressing.
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    let builder = aws_sdk_s3::config::Builder::from(&shared);
    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };
    Client::from_conf(s3_config)
}

/// Object sink backed by S3 `PutObject`.
#[derive(Clone)]
pub struct S3Sink {
    client: Client,
}

impl S3Sink {
    /// Wrap an existing client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a sink with a client for the given store settings.
    pub async fn from_config(config: &StoreConfig) -> Self {
        Self::new(create_s3_client(config).await)
    }
}

const fn canned_acl(acl: CannedAcl) -> ObjectCannedAcl {
    match acl {
        CannedAcl::Private => ObjectCannedAcl::Private,
    }
}

const fn server_side_encryption(encryption: Encryption) -> ServerSideEncryption {
    match encryption {
        Encryption::Aes256 => ServerSideEncryption::Aes256,
    }
}

#[async_trait]
impl ObjectSink for S3Sink {
    async fn put_object(&self, request: PutObjectRequest) -> StoreResult<PutObjectReceipt> {
        let content_length =
            i64::try_from(request.body.len()).map_err(|_| StoreError::InvalidRequest {
                field: "body",
                reason: "payload too large",
                key: request.key.clone(),
            })?;

        let output = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .acl(canned_acl(request.acl))
            .server_side_encryption(server_side_encryption(request.encryption))
            .content_type(&request.content_type)
            .content_disposition(&request.content_disposition)
            .content_length(content_length)
            .body(ByteStream::from(request.body))
            .send()
            .await
            .map_err(|err| {
                let detail = DisplayErrorContext(&err).to_string();
                StoreError::transport("s3.put_object", request.key.clone(), detail, err)
            })?;

        Ok(PutObjectReceipt {
            e_tag: output.e_tag().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_maps_to_sdk_types() {
        assert_eq!(canned_acl(CannedAcl::Private), ObjectCannedAcl::Private);
        assert_eq!(
            server_side_encryption(Encryption::Aes256),
            ServerSideEncryption::Aes256
        );
        assert_eq!(ObjectCannedAcl::Private.as_str(), CannedAcl::Private.as_str());
        assert_eq!(
            ServerSideEncryption::Aes256.as_str(),
            Encryption::Aes256.as_str()
        );
    }

    #[tokio::test]
    async fn client_honours_custom_endpoint() {
        let config = StoreConfig {
            endpoint: Some("http://localhost:4566".to_string()),
            ..StoreConfig::default()
        };
        let client = create_s3_client(&config).await;
        assert_eq!(
            client.config().region().map(ToString::to_string),
            Some("eu-west-2".to_string())
        );
    }
}
