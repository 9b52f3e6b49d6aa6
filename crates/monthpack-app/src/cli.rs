//! Command-line entry point for a batch run.

use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use monthpack_config::{EntryNaming, RunConfig};
use monthpack_store::{MemorySink, ObjectSink, S3Sink};
use monthpack_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, Metrics, build_sha, init_logging,
};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::{AppError, AppResult};
use crate::orchestrator::Orchestrator;
use crate::report::RunReport;

const EXIT_SUCCESS: i32 = 0;
const EXIT_TASK_FAILURE: i32 = 1;
const EXIT_FATAL: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "monthpack",
    version,
    about = "Pack month directories into zip archives and upload them to S3"
)]
struct Cli {
    /// Directory whose sub-directories are packed [default: .]
    #[arg(value_name = "SOURCE_DIR", env = "MONTHPACK_SOURCE_DIR")]
    source_dir: Option<PathBuf>,
    /// Directory that receives the archives [default: $HOME/Projects/monthpack-output]
    #[arg(value_name = "OUTPUT_DIR", env = "MONTHPACK_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
    /// JSON configuration file applied before command-line overrides
    #[arg(long, env = "MONTHPACK_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "MONTHPACK_BUCKET")]
    bucket: Option<String>,
    #[arg(long, env = "MONTHPACK_REGION")]
    region: Option<String>,
    /// Key prefix for uploaded archives
    #[arg(long, env = "MONTHPACK_BASE_PATH")]
    base_path: Option<String>,
    /// Custom S3 endpoint (path-style addressing)
    #[arg(long, env = "MONTHPACK_ENDPOINT")]
    endpoint: Option<String>,
    /// Upper bound on concurrent archive tasks
    #[arg(long, env = "MONTHPACK_MAX_CONCURRENCY")]
    max_concurrency: Option<NonZeroUsize>,
    #[arg(long, value_enum, env = "MONTHPACK_ENTRY_NAMING")]
    entry_naming: Option<EntryNamingArg>,
    /// Skip empty month directories instead of writing empty archives
    #[arg(long, env = "MONTHPACK_SKIP_EMPTY")]
    skip_empty: bool,
    /// Pack directories whose name starts with a dot
    #[arg(long, env = "MONTHPACK_INCLUDE_HIDDEN")]
    include_hidden: bool,
    /// Write archives but record uploads in memory instead of sending them
    #[arg(long, env = "MONTHPACK_DRY_RUN")]
    dry_run: bool,
    #[arg(long, env = "MONTHPACK_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    /// Log output format: `pretty` or `json`
    #[arg(long, env = "MONTHPACK_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EntryNamingArg {
    BaseName,
    WithParent,
}

impl From<EntryNamingArg> for EntryNaming {
    fn from(value: EntryNamingArg) -> Self {
        match value {
            EntryNamingArg::BaseName => Self::BaseName,
            EntryNamingArg::WithParent => Self::WithParent,
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value).ok_or_else(|| format!("unknown log format `{value}`"))
}

impl Cli {
    /// Layer defaults, the optional JSON file and command-line overrides.
    fn resolve_config(&self) -> AppResult<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .map_err(|source| AppError::config("cli.load_config", source))?,
            None => RunConfig::default(),
        };

        if let Some(source_dir) = &self.source_dir {
            config.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(bucket) = &self.bucket {
            config.store.bucket.clone_from(bucket);
        }
        if let Some(region) = &self.region {
            config.store.region.clone_from(region);
        }
        if let Some(base_path) = &self.base_path {
            config.store.base_path.clone_from(base_path);
        }
        if self.endpoint.is_some() {
            config.store.endpoint.clone_from(&self.endpoint);
        }
        if self.max_concurrency.is_some() {
            config.archive.max_concurrency = self.max_concurrency;
        }
        if let Some(naming) = self.entry_naming {
            config.archive.entry_naming = naming.into();
        }
        if self.skip_empty {
            config.archive.skip_empty = true;
        }
        if self.include_hidden {
            config.archive.skip_hidden = false;
        }

        config
            .validate()
            .map_err(|source| AppError::config("cli.validate_config", source))?;
        Ok(config)
    }
}

/// Parse arguments, run one batch and return the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let result = execute(&cli).await;
    match &result {
        Ok(report) if !report.is_success() => {
            eprintln!("error: {} directory task(s) failed", report.failures.len());
        }
        Ok(_) => {}
        Err(err) => eprintln!("error: {}", error_chain(err)),
    }
    exit_code(&result)
}

fn exit_code(result: &AppResult<RunReport>) -> i32 {
    match result {
        Ok(report) if report.is_success() => EXIT_SUCCESS,
        Ok(_) => EXIT_TASK_FAILURE,
        Err(_) => EXIT_FATAL,
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}

async fn execute(cli: &Cli) -> AppResult<RunReport> {
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
    })
    .map_err(|source| AppError::telemetry("cli.init_logging", source))?;

    let span = info_span!("monthpack", build_sha = build_sha());
    run_batch(cli).instrument(span).await
}

async fn run_batch(cli: &Cli) -> AppResult<RunReport> {
    let config = cli.resolve_config()?;
    let metrics =
        Metrics::new().map_err(|source| AppError::telemetry("cli.init_metrics", source))?;
    info!(
        source = %config.source_dir.display(),
        output = %config.output_dir.display(),
        bucket = %config.store.bucket,
        base_path = %config.store.base_path,
        entry_naming = config.archive.entry_naming.as_str(),
        dry_run = cli.dry_run,
        "starting monthpack run"
    );

    let report = if cli.dry_run {
        run_with(&config, MemorySink::new(), &metrics).await?
    } else {
        let sink = S3Sink::from_config(&config.store).await;
        run_with(&config, sink, &metrics).await?
    };

    log_report(&report, &metrics);
    Ok(report)
}

async fn run_with<S: ObjectSink>(
    config: &RunConfig,
    sink: S,
    metrics: &Metrics,
) -> AppResult<RunReport> {
    Orchestrator::new(config, sink, metrics.clone()).run().await
}

fn log_report(report: &RunReport, metrics: &Metrics) {
    for failure in &report.failures {
        warn!(
            directory = %failure.directory,
            stage = %failure.stage,
            error = ?failure.error,
            "task failed"
        );
    }
    let snapshot = metrics.snapshot();
    info!(
        archives_succeeded = snapshot.archives_succeeded,
        archives_failed = snapshot.archives_failed,
        uploads_succeeded = snapshot.uploads_succeeded,
        uploads_failed = snapshot.uploads_failed,
        uploaded_bytes = snapshot.uploaded_bytes,
        skipped_entries = snapshot.skipped_entries,
        "monthpack run finished"
    );
    match metrics.render() {
        Ok(rendered) => debug!(metrics = %rendered, "run metrics"),
        Err(err) => warn!(error = %err, "failed to render run metrics"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::report::TaskStage;
    use monthpack_config::ConfigError;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("monthpack").chain(args.iter().copied()))
    }

    #[test]
    fn positional_directories_override_defaults() -> anyhow::Result<()> {
        let cli = parse(&["/data/police", "/tmp/out"])?;
        let config = cli.resolve_config()?;
        assert_eq!(config.source_dir, PathBuf::from("/data/police"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.store.bucket, "dfp-datalake-london");
        Ok(())
    }

    #[test]
    fn flags_override_store_and_archive_settings() -> anyhow::Result<()> {
        let cli = parse(&[
            "src",
            "out",
            "--bucket",
            "other-bucket",
            "--base-path",
            "lake/raw",
            "--endpoint",
            "http://localhost:4566",
            "--max-concurrency",
            "4",
            "--entry-naming",
            "with-parent",
            "--skip-empty",
            "--include-hidden",
        ])?;
        let config = cli.resolve_config()?;
        assert_eq!(config.store.bucket, "other-bucket");
        assert_eq!(config.store.base_path, "lake/raw");
        assert_eq!(
            config.store.endpoint.as_deref(),
            Some("http://localhost:4566")
        );
        assert_eq!(config.archive.max_concurrency, NonZeroUsize::new(4));
        assert_eq!(config.archive.entry_naming, EntryNaming::WithParent);
        assert!(config.archive.skip_empty);
        assert!(!config.archive.skip_hidden);
        Ok(())
    }

    #[test]
    fn error_chain_joins_sources() {
        let err = AppError::config(
            "cli.load_config",
            ConfigError::Io {
                path: PathBuf::from("missing.json"),
                source: std::io::Error::other("not found"),
            },
        );
        let message = error_chain(&err);
        assert!(message.starts_with("configuration operation failed: "));
        assert!(message.ends_with("not found"));
    }

    #[test]
    fn zero_concurrency_is_rejected_by_the_parser() {
        assert!(parse(&["--max-concurrency", "0"]).is_err());
    }

    #[test]
    fn blank_bucket_fails_validation() -> anyhow::Result<()> {
        let cli = parse(&["src", "out", "--bucket", " "])?;
        let err = cli
            .resolve_config()
            .expect_err("blank bucket must be rejected");
        assert!(matches!(
            err,
            AppError::Config {
                operation: "cli.validate_config",
                source: ConfigError::InvalidField { field: "bucket", .. },
            }
        ));
        Ok(())
    }

    #[test]
    fn config_file_is_applied_before_flags() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("monthpack.json");
        std::fs::write(
            &path,
            r#"{"store": {"bucket": "from-file", "region": "us-east-1"}}"#,
        )?;
        let cli = parse(&[
            "src",
            "out",
            "--config",
            path.to_str().unwrap_or_default(),
            "--region",
            "eu-west-1",
        ])?;
        let config = cli.resolve_config()?;
        assert_eq!(config.store.bucket, "from-file");
        assert_eq!(config.store.region, "eu-west-1");
        Ok(())
    }

    #[test]
    fn log_format_accepts_known_labels_only() -> anyhow::Result<()> {
        assert_eq!(parse(&["--log-format", "json"])?.log_format, Some(LogFormat::Json));
        assert_eq!(parse(&["--log-format", "Pretty"])?.log_format, Some(LogFormat::Pretty));
        assert_eq!(parse(&[])?.log_format, None);
        assert!(parse(&["--log-format", "xml"]).is_err());
        Ok(())
    }

    #[test]
    fn exit_code_maps_run_outcomes() {
        let malformed = monthpack_fsops::resolve("202005").expect_err("no separator");
        assert_eq!(exit_code(&Ok(RunReport::default())), EXIT_SUCCESS);

        let mut failed = RunReport::default();
        failed.record_failure(
            "202005",
            TaskStage::Resolve,
            TaskError::fsops(malformed),
        );
        assert_eq!(exit_code(&Ok(failed)), EXIT_TASK_FAILURE);

        let fatal = AppError::config(
            "cli.validate_config",
            ConfigError::InvalidField {
                section: "store",
                field: "bucket",
                value: None,
                reason: "empty",
            },
        );
        assert_eq!(exit_code(&Err(fatal)), EXIT_FATAL);
    }
}
