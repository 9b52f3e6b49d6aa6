#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! Batch wiring for monthpack: pack every month directory under a source root
//! into `<group>/<unit>.zip`, then upload the archives to an object store.
//!
//! Layout: `orchestrator.rs` (discover, fan-out archive, sequential upload),
//! `report.rs` (per-directory outcomes), `cli.rs` (argument parsing and exit
//! codes), `error.rs` (fatal and per-task errors).

pub(crate) mod cli;
pub mod error;
pub mod orchestrator;
pub mod report;

pub use cli::run;
pub use error::{AppError, AppResult, TaskError};
pub use monthpack_store::UploadedObject;
pub use orchestrator::Orchestrator;
pub use report::{ArchiveResult, RunReport, SkipReason, SkippedEntry, TaskFailure, TaskStage};
