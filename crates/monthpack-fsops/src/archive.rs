//! Deflate packer that writes one zip archive per month directory.
//!
//! # Design
//! - Entries are written in the order given, one per input file.
//! - Timestamps are pinned to the zip epoch so repeated runs produce identical bytes.
//! - Any failing input aborts the call; the partial file must not be uploaded.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use monthpack_config::EntryNaming;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{FsOpsError, FsOpsResult};

const ENTRY_MODE: u32 = 0o644;
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Counters describing one written archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Number of entries written.
    pub entries: usize,
    /// Uncompressed bytes read from the inputs.
    pub bytes_in: u64,
    /// Size of the archive on disk.
    pub archive_bytes: u64,
}

/// Writes input files into a deflated zip archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Archiver {
    naming: EntryNaming,
}

impl Archiver {
    /// Create an archiver using the given entry naming.
    #[must_use]
    pub const fn new(naming: EntryNaming) -> Self {
        Self { naming }
    }

    /// Entry naming used by this archiver.
    #[must_use]
    pub const fn naming(&self) -> EntryNaming {
        self.naming
    }

    /// Pack `inputs` into a zip archive at `output`.
    ///
    /// Missing parent directories are created; an existing archive is truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent directory cannot be created, the archive
    /// cannot be written, or any input cannot be opened or read.
    pub fn pack(&self, output: &Path, inputs: &[impl AsRef<Path>]) -> FsOpsResult<PackSummary> {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| FsOpsError::io("pack.create_parent", parent, err))?;
        }

        let file = File::create(output).map_err(|err| FsOpsError::io("pack.create", output, err))?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let mut summary = PackSummary::default();

        for input in inputs {
            let input = input.as_ref();
            let entry_name = self.entry_name(input)?;
            let mut source =
                File::open(input).map_err(|err| FsOpsError::io("pack.open_input", input, err))?;
            let size = source
                .metadata()
                .map_err(|err| FsOpsError::io("pack.stat_input", input, err))?
                .len();

            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(DateTime::default())
                .unix_permissions(ENTRY_MODE)
                .large_file(size >= ZIP64_THRESHOLD);
            writer
                .start_file(entry_name.as_str(), options)
                .map_err(|err| FsOpsError::zip("pack.start_entry", input, err))?;
            let copied = io::copy(&mut source, &mut writer)
                .map_err(|err| FsOpsError::io("pack.copy_input", input, err))?;

            debug!(entry = %entry_name, bytes = copied, "archived entry");
            summary.entries += 1;
            summary.bytes_in += copied;
        }

        let mut buffered = writer
            .finish()
            .map_err(|err| FsOpsError::zip("pack.finish", output, err))?;
        buffered
            .flush()
            .map_err(|err| FsOpsError::io("pack.flush", output, err))?;
        drop(buffered);

        summary.archive_bytes = fs::metadata(output)
            .map_err(|err| FsOpsError::io("pack.stat_output", output, err))?
            .len();
        Ok(summary)
    }

    fn entry_name(&self, input: &Path) -> FsOpsResult<String> {
        let file_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| FsOpsError::InvalidInput {
                field: "input",
                reason: "path has no file name",
                value: Some(input.display().to_string()),
            })?;
        match self.naming {
            EntryNaming::BaseName => Ok(file_name),
            EntryNaming::WithParent => {
                let parent = input
                    .parent()
                    .and_then(Path::file_name)
                    .map(|name| name.to_string_lossy().into_owned());
                Ok(parent.map_or_else(|| file_name.clone(), |dir| format!("{dir}/{file_name}")))
            }
        }
    }
}
