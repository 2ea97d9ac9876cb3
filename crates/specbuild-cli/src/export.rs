//! # HTML Export
//!
//! Hands the augmented markdown to an external rendering program. The
//! export is the only asynchronous step of the build: it runs on a
//! current-thread tokio runtime and is awaited before the build returns.
//!
//! A failed export is logged and reported in the build outcome; it never
//! fails the build.

use std::path::{Path, PathBuf};

use specbuild_core::{ExportFailure, RendererConfig};

/// Placeholder replaced with the markdown input path.
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced with the HTML output path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// What happened to the HTML export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The renderer wrote the HTML file.
    Rendered(PathBuf),
    /// Export was not requested.
    Skipped,
    /// The renderer could not produce output.
    Failed(ExportFailure),
}

/// Render `input` to `output`, blocking until the renderer exits.
pub fn export_html(renderer: &RendererConfig, input: &Path, output: &Path) -> ExportOutcome {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            return failed(ExportFailure {
                reason: format!("cannot start runtime: {e}"),
            })
        }
    };

    match runtime.block_on(render(renderer, input, output)) {
        Ok(()) => {
            tracing::info!(output = %output.display(), "exported HTML");
            ExportOutcome::Rendered(output.to_path_buf())
        }
        Err(failure) => failed(failure),
    }
}

fn failed(failure: ExportFailure) -> ExportOutcome {
    tracing::error!(error = %failure, "HTML export failed");
    ExportOutcome::Failed(failure)
}

/// Run the renderer once.
///
/// # Errors
///
/// Returns `ExportFailure` if the program cannot be started, exits
/// unsuccessfully, or does not write `output`.
///
/// The renderer runs in the directory of `output` and receives absolute
/// paths. An `output` left over from an earlier build is removed first.
pub async fn render(
    renderer: &RendererConfig,
    input: &Path,
    output: &Path,
) -> Result<(), ExportFailure> {
    let input = absolute(input)?;
    let output = absolute(output)?;

    match tokio::fs::remove_file(&output).await {
        Ok(()) => tracing::debug!(output = %output.display(), "removed previous HTML export"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ExportFailure {
                reason: format!("cannot remove previous {}: {e}", output.display()),
            })
        }
    }

    let args = substitute_args(&renderer.args, &input, &output);
    tracing::debug!(program = %renderer.program, args = ?args, "starting renderer");

    let mut command = tokio::process::Command::new(&renderer.program);
    command.args(&args);
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        command.current_dir(dir);
    }

    let result = command.output().await.map_err(|e| ExportFailure {
        reason: format!("cannot run '{}': {e}", renderer.program),
    })?;

    if !result.status.success() {
        return Err(ExportFailure {
            reason: format!(
                "'{}' exited with {}: {}",
                renderer.program,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ),
        });
    }

    if !output.is_file() {
        return Err(ExportFailure {
            reason: format!(
                "'{}' succeeded but did not write {}",
                renderer.program,
                output.display()
            ),
        });
    }

    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf, ExportFailure> {
    std::path::absolute(path).map_err(|e| ExportFailure {
        reason: format!("cannot resolve {}: {e}", path.display()),
    })
}

/// Replace `{input}` and `{output}` in every argument.
pub fn substitute_args(args: &[String], input: &Path, output: &Path) -> Vec<String> {
    let input = input.display().to_string();
    let output = output.display().to_string();
    args.iter()
        .map(|a| {
            a.replace(INPUT_PLACEHOLDER, &input)
                .replace(OUTPUT_PLACEHOLDER, &output)
        })
        .collect()
}
