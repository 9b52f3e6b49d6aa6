use std::fs;
use std::thread;

use anyhow::Result;
use monthpack_config::EntryNaming;
use monthpack_fsops::{ArchiveLayout, Archiver, FsOpsError, resolve};
use monthpack_test_support::archive::read_entries;
use monthpack_test_support::fixtures::MonthTree;
use zip::CompressionMethod;

#[test]
fn every_input_becomes_one_deflated_entry() -> Result<()> {
    let tree = MonthTree::new()?;
    let dir = tree.month(
        "2020-05",
        &[("a.csv", b"month,crime\n05,burglary\n"), ("b.csv", b"month,crime\n05,arson\n")],
    )?;
    let output = tree.output().join("2020").join("05.zip");

    let summary = Archiver::new(EntryNaming::BaseName)
        .pack(&output, &[dir.join("a.csv"), dir.join("b.csv")])?;
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.bytes_in, 45);
    assert_eq!(summary.archive_bytes, fs::metadata(&output)?.len());

    let entries = read_entries(&output)?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["a.csv"].contents, fs::read(dir.join("a.csv"))?);
    assert_eq!(entries["b.csv"].contents, fs::read(dir.join("b.csv"))?);
    assert!(
        entries
            .values()
            .all(|entry| entry.method == CompressionMethod::Deflated)
    );
    Ok(())
}

#[test]
fn with_parent_naming_keeps_month_directory() -> Result<()> {
    let tree = MonthTree::new()?;
    let dir = tree.month("2020-05", &[("a.csv", b"a")])?;
    let output = tree.output().join("2020").join("05.zip");

    Archiver::new(EntryNaming::WithParent).pack(&output, &[dir.join("a.csv")])?;
    let entries = read_entries(&output)?;
    assert!(entries.contains_key("2020-05/a.csv"));
    Ok(())
}

#[test]
fn repacking_is_idempotent_and_byte_identical() -> Result<()> {
    let tree = MonthTree::new()?;
    let dir = tree.month("2019-03", &[("x.csv", b"1,2,3\n4,5,6\n")])?;
    let layout = ArchiveLayout::new(tree.output(), "zip");
    let output = layout.local_path(&resolve("2019-03")?);
    let archiver = Archiver::default();

    archiver.pack(&output, &[dir.join("x.csv")])?;
    let first = fs::read(&output)?;
    archiver.pack(&output, &[dir.join("x.csv")])?;
    let second = fs::read(&output)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn empty_input_list_produces_valid_empty_archive() -> Result<()> {
    let tree = MonthTree::new()?;
    let output = tree.output().join("2021").join("01.zip");
    let inputs: Vec<std::path::PathBuf> = Vec::new();

    let summary = Archiver::default().pack(&output, &inputs)?;
    assert_eq!(summary.entries, 0);
    assert!(read_entries(&output)?.is_empty());
    Ok(())
}

#[test]
fn missing_input_aborts_pack() -> Result<()> {
    let tree = MonthTree::new()?;
    let dir = tree.month("2019-04", &[("present.csv", b"ok")])?;
    let output = tree.output().join("2019").join("04.zip");

    let err = Archiver::default()
        .pack(&output, &[dir.join("present.csv"), dir.join("missing.csv")])
        .expect_err("missing input must fail");
    assert!(matches!(
        err,
        FsOpsError::Io {
            operation: "pack.open_input",
            ..
        }
    ));
    Ok(())
}

#[test]
fn concurrent_packs_share_parent_directory() -> Result<()> {
    let tree = MonthTree::new()?;
    let mut months = Vec::new();
    for month in ["2019-01", "2019-02", "2019-03", "2019-04"] {
        let dir = tree.month(month, &[("data.csv", month.as_bytes())])?;
        months.push((month, dir));
    }
    let layout = ArchiveLayout::new(tree.output(), "zip");

    let handles: Vec<_> = months
        .iter()
        .map(|(month, dir)| {
            let output = layout.local_path(&resolve(month)?);
            let input = dir.join("data.csv");
            Ok(thread::spawn(move || {
                Archiver::default().pack(&output, &[input]).map(|_| output)
            }))
        })
        .collect::<Result<_>>()?;

    for handle in handles {
        let output = handle
            .join()
            .map_err(|_| anyhow::anyhow!("pack thread panicked"))??;
        assert_eq!(read_entries(&output)?.len(), 1);
    }
    assert_eq!(fs::read_dir(tree.output().join("2019"))?.count(), 4);
    Ok(())
}
