//! # Revision Lookup
//!
//! The version stamped into the augmented markdown is the commit the working
//! tree points at, read with `git rev-parse HEAD`.

use std::path::Path;
use std::process::Command;

use specbuild_core::SpecbuildError;

/// Resolve the `HEAD` revision of the working tree containing `root`.
///
/// # Errors
///
/// Returns `SpecbuildError::RevisionUnavailable` if git cannot be run, the
/// directory is not a working tree, or the output is empty.
pub fn resolve_revision(root: &Path) -> Result<String, SpecbuildError> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(root)
        .output()
        .map_err(|e| SpecbuildError::RevisionUnavailable {
            reason: format!("cannot run git: {e}"),
        })?;

    if !output.status.success() {
        return Err(SpecbuildError::RevisionUnavailable {
            reason: format!(
                "git rev-parse HEAD failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if revision.is_empty() {
        return Err(SpecbuildError::RevisionUnavailable {
            reason: "git rev-parse HEAD printed nothing".to_string(),
        });
    }

    tracing::debug!(revision = %revision, "resolved source revision");
    Ok(revision)
}
