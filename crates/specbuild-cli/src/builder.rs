//! # Build Subcommand
//!
//! Composes the JSON Schema from the markdown specification and writes the
//! build directory:
//!
//! ```text
//! build/
//!   otio.schema.json   composed schema
//!   index.md           specification + schema link + version
//!   index.html         rendered export
//!   figures/           copied figure files
//! ```
//!
//! Every fallible step that can reject the input (missing files, template
//! errors, malformed JSON, schema compilation, revision lookup) runs before
//! the first write, so a rejected build leaves the build directory untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use specbuild_core::{sha256_digest, BuildConfig, ContentDigest, SpecDocument, SpecbuildError};
use specbuild_schema::{extract_fragments, CompiledSchema, SchemaAssembler};

use crate::export::{export_html, ExportOutcome};
use crate::revision::resolve_revision;

/// Arguments for the `specbuild build` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Markdown specification (overrides the configured path).
    #[arg(long, value_name = "FILE")]
    pub spec: Option<PathBuf>,

    /// Handlebars schema template (overrides the configured path).
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Output directory (overrides the configured path).
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Version identifier to stamp instead of `git rev-parse HEAD`.
    #[arg(long, value_name = "ID")]
    pub revision: Option<String>,

    /// Do not run the HTML renderer.
    #[arg(long)]
    pub skip_export: bool,
}

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Where the composed schema was written.
    pub schema_path: PathBuf,
    /// Digest of the composed schema bytes.
    pub digest: ContentDigest,
    /// Number of fragments spliced into the template.
    pub fragment_count: usize,
    /// Revision stamped into the markdown copy.
    pub revision: String,
    /// Figure files copied into the build directory.
    pub figures: Vec<PathBuf>,
    /// Result of the HTML export.
    pub export: ExportOutcome,
}

/// Execute the build subcommand.
///
/// Returns exit code 0 on success. Export failures are reported but do not
/// change the exit code.
pub fn run_build(args: &BuildArgs, config: &BuildConfig, root: &Path) -> Result<u8> {
    let report = build(args, config, root).context("build failed")?;

    println!(
        "Schema: {} ({} fragments, {})",
        report.schema_path.display(),
        report.fragment_count,
        report.digest
    );
    println!("Version: {}", report.revision);
    match &report.export {
        ExportOutcome::Rendered(path) => println!("HTML: {}", path.display()),
        ExportOutcome::Skipped => println!("HTML: skipped"),
        ExportOutcome::Failed(failure) => println!("HTML: FAILED: {}", failure.reason),
    }

    Ok(0)
}

/// Run the full build pipeline.
///
/// # Errors
///
/// Returns `SpecbuildError::MissingInput` for an absent or empty
/// specification or template, `SpecbuildError::Parse` when the template or
/// its output is malformed, `SpecbuildError::Schema` when the composed schema
/// does not compile, `SpecbuildError::RevisionUnavailable` when no revision
/// can be stamped, and `SpecbuildError::Io` for write failures.
pub fn build(
    args: &BuildArgs,
    config: &BuildConfig,
    root: &Path,
) -> Result<BuildReport, SpecbuildError> {
    let config = effective_config(args, config, root);

    let document = SpecDocument::load(&config.spec)?;
    let assembler = SchemaAssembler::load(&config.template)?;
    let revision = match &args.revision {
        Some(revision) => revision.clone(),
        None => resolve_revision(root)?,
    };

    let fragments = extract_fragments(document.text());
    let composed = assembler.assemble(&fragments)?;
    CompiledSchema::compile(&composed.value)?;
    let bytes = composed.to_bytes()?;
    let digest = sha256_digest(&bytes);

    std::fs::create_dir_all(&config.build_dir)?;

    let spec_output = config.spec_output_path();
    std::fs::write(&spec_output, document.augmented(&config.schema_file, &revision))?;

    let schema_path = config.schema_path();
    std::fs::write(&schema_path, bytes.as_bytes())?;
    tracing::info!(
        path = %schema_path.display(),
        fragments = composed.fragment_count,
        digest = %digest,
        "wrote composed schema"
    );

    let figures = copy_figures(&config.figures_dir, &config.build_dir.join("figures"))?;

    let export = if args.skip_export {
        ExportOutcome::Skipped
    } else {
        export_html(&config.renderer, &spec_output, &config.html_output_path())
    };

    Ok(BuildReport {
        schema_path,
        digest,
        fragment_count: composed.fragment_count,
        revision,
        figures,
        export,
    })
}

/// Root the configuration and apply command-line overrides.
fn effective_config(args: &BuildArgs, config: &BuildConfig, root: &Path) -> BuildConfig {
    let mut config = config.rooted(root);
    if let Some(spec) = &args.spec {
        config.spec = crate::resolve_path(spec, root);
    }
    if let Some(template) = &args.template {
        config.template = crate::resolve_path(template, root);
    }
    if let Some(build_dir) = &args.build_dir {
        config.build_dir = if build_dir.is_absolute() {
            build_dir.clone()
        } else {
            root.join(build_dir)
        };
    }
    config
}

/// Copy every regular file of `from` into `to`.
///
/// A missing source directory is skipped with a warning.
fn copy_figures(from: &Path, to: &Path) -> Result<Vec<PathBuf>, SpecbuildError> {
    if !from.is_dir() {
        tracing::warn!(dir = %from.display(), "figures directory not found; skipping");
        return Ok(Vec::new());
    }

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(from)? {
        let path = entry?.path();
        if path.is_file() {
            sources.push(path);
        }
    }
    sources.sort();

    std::fs::create_dir_all(to)?;
    let mut copied = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = to.join(name);
        std::fs::copy(&source, &target)?;
        tracing::debug!(from = %source.display(), to = %target.display(), "copied figure");
        copied.push(target);
    }
    Ok(copied)
}
