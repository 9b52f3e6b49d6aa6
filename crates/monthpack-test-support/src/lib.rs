#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]

//! Shared test helpers used across the monthpack suites.
//! Layout: fixtures.rs (month trees on disk), archive.rs (reading zips back).

pub mod archive;
pub mod fixtures;
