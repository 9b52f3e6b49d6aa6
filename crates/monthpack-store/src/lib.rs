#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! Remote object store side of a monthpack run.
//!
//! Layout: `sink.rs` (transport-agnostic put contract), `uploader.rs` (reads an
//! archive and sends it with the required metadata), `s3.rs` (AWS S3 sink),
//! `memory.rs` (in-process sink), `sniff.rs` (content type detection).

pub mod error;
pub mod memory;
pub mod s3;
pub mod sink;
pub mod sniff;
pub mod uploader;

pub use error::{StoreError, StoreResult};
pub use memory::MemorySink;
pub use s3::{S3Sink, create_s3_client};
pub use sink::{CannedAcl, Encryption, ObjectSink, PutObjectReceipt, PutObjectRequest};
pub use sniff::detect_content_type;
pub use uploader::{UploadedObject, Uploader};
