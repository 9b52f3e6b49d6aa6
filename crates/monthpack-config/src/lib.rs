#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! Typed configuration for a monthpack run.
//!
//! Layout: `model.rs` (run, archive and store models), `defaults.rs` (documented
//! defaults), `validate.rs` (field validation), `loader.rs` (JSON file layering).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{ArchiveConfig, EntryNaming, RunConfig, StoreConfig};
