#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! Filesystem side of a monthpack run: name resolution, source discovery and
//! zip packing.
//!
//! Layout: `naming.rs` (directory name to archive path and key), `discover.rs`
//! (one-level source listing), `archive.rs` (deflate packer), `error.rs`.

pub mod archive;
pub mod discover;
pub mod error;
pub mod naming;

pub use archive::{Archiver, PackSummary};
pub use discover::{EntryKind, MonthGroup, SourceEntry, collect_group, list_entries};
pub use error::{FsOpsError, FsOpsResult};
pub use naming::{ArchiveLayout, ArchiveTask, MonthName, resolve, resolve_entry, resolve_with};
