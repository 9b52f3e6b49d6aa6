#![forbid(unsafe_code)]
#![deny(unused_must_use, missing_docs)]

//! `monthpack` binary: runs one batch and exits with its status code.

use std::process;

/// Run the batch and exit with `0` (all tasks succeeded), `1` (some task
/// failed) or `2` (fatal error).
#[tokio::main]
async fn main() {
    process::exit(monthpack_app::run().await);
}
