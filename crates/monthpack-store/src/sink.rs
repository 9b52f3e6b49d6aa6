//! Transport-agnostic contract for writing one object.

use async_trait::async_trait;

use crate::error::StoreResult;

/// Access policy applied to an uploaded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedAcl {
    /// Only the bucket owner can read the object.
    Private,
}

impl CannedAcl {
    /// Wire label of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
        }
    }
}

/// Server-side encryption requested for an uploaded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encryption {
    /// Store-managed AES-256 keys.
    Aes256,
}

impl Encryption {
    /// Wire label of the encryption mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aes256 => "AES256",
        }
    }
}

/// A complete request to store one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    /// Destination bucket.
    pub bucket: String,
    /// Full object key including the base path.
    pub key: String,
    /// Object payload, fully buffered.
    pub body: Vec<u8>,
    /// MIME type sniffed from the payload.
    pub content_type: String,
    /// `Content-Disposition` header value.
    pub content_disposition: String,
    /// Access policy.
    pub acl: CannedAcl,
    /// Server-side encryption mode.
    pub encryption: Encryption,
}

/// What the store reported back for a stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectReceipt {
    /// Entity tag assigned by the store, when reported.
    pub e_tag: Option<String>,
}

/// Writes objects to a remote (or in-process) store.
///
/// One call is one attempt; retry policy belongs to callers.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    /// Store `request.body` under `request.key` with the request metadata.
    async fn put_object(&self, request: PutObjectRequest) -> StoreResult<PutObjectReceipt>;
}
