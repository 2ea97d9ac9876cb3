//! # Test Subcommand
//!
//! Checks the sample documents against the composed schema written by
//! `specbuild build`.
//!
//! Every sample is visited and reported. Failing samples do not change the
//! exit code unless `--strict` is given; a schema that is missing or does not
//! compile is an operational error and always exits 1.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use specbuild_core::BuildConfig;
use specbuild_schema::{discover_samples, run_samples, CompiledSchema, SampleReport, SampleStatus};

/// Arguments for the `specbuild test` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct TestArgs {
    /// Composed schema to load (defaults to the build output).
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Directory of sample documents (overrides the configured path).
    #[arg(long, value_name = "DIR")]
    pub samples: Option<PathBuf>,

    /// Exit with status 1 when any sample fails.
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the test subcommand.
pub fn run_test(args: &TestArgs, config: &BuildConfig, root: &Path) -> Result<u8> {
    let report = check(args, config, root)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
    } else {
        print!("{}", format_report(&report));
    }

    if args.strict && report.failed() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Load the schema and run every sample.
pub fn check(args: &TestArgs, config: &BuildConfig, root: &Path) -> Result<SampleReport> {
    let config = config.rooted(root);
    let schema_path = args
        .schema
        .as_deref()
        .map(|p| crate::resolve_path(p, root))
        .unwrap_or_else(|| config.schema_path());
    let samples_dir = args
        .samples
        .as_deref()
        .map(|p| crate::resolve_path(p, root))
        .unwrap_or_else(|| config.samples_dir.clone());

    let schema = CompiledSchema::load(&schema_path)
        .with_context(|| format!("failed to load composed schema {}", schema_path.display()))?;
    tracing::info!(path = %schema_path.display(), "compiled composed schema");

    let files = discover_samples(&samples_dir).context("failed to list sample documents")?;
    Ok(run_samples(&schema, &files))
}

/// Render a report the way the tester prints it: each sample path, its
/// violations when it fails, then a summary line.
pub fn format_report(report: &SampleReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let _ = writeln!(out, "{}", outcome.path.display());
        match &outcome.status {
            SampleStatus::Pass => {}
            SampleStatus::Fail { violations } => {
                let _ = writeln!(out, "{violations}");
            }
            SampleStatus::Unparsable { error } => {
                let _ = writeln!(out, "  {error}");
            }
        }
    }
    let _ = writeln!(out, "Samples: {}/{} passed", report.passed(), report.total());
    out
}
