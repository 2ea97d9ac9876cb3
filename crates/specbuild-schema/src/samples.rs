//! # Sample Runner
//!
//! Runs every sample document through a compiled schema. Each file is
//! visited exactly once; a malformed or failing sample is recorded and the
//! run moves on.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use specbuild_core::{InputKind, ParseError, SpecbuildError};

use crate::validate::{CompiledSchema, ValidationViolations};

/// Outcome of checking one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleStatus {
    /// The document satisfies the schema.
    Pass,
    /// The document violates the schema.
    Fail {
        /// Every violation reported by the validator.
        violations: ValidationViolations,
    },
    /// The document could not be read or is not JSON.
    Unparsable {
        /// Why the document was not validated.
        error: String,
    },
}

/// One sample and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleOutcome {
    /// Path of the sample file.
    pub path: PathBuf,
    /// What happened.
    pub status: SampleStatus,
}

impl SampleOutcome {
    /// Returns true for [`SampleStatus::Pass`].
    pub fn passed(&self) -> bool {
        matches!(self.status, SampleStatus::Pass)
    }
}

/// Outcomes for a whole sample set, in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleReport {
    /// Per-file outcomes.
    pub outcomes: Vec<SampleOutcome>,
}

impl SampleReport {
    /// Number of samples visited.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of passing samples.
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Number of failing or unparsable samples.
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Outcome for a given path, if it was visited.
    pub fn outcome(&self, path: &Path) -> Option<&SampleOutcome> {
        self.outcomes.iter().find(|o| o.path == path)
    }
}

/// List the regular files of a sample directory, sorted by path.
///
/// # Errors
///
/// Returns `SpecbuildError::MissingInput` if `dir` is not a directory.
pub fn discover_samples(dir: &Path) -> Result<Vec<PathBuf>, SpecbuildError> {
    if !dir.is_dir() {
        return Err(SpecbuildError::missing(InputKind::SampleDirectory, dir));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Check one sample file.
pub fn check_sample(schema: &CompiledSchema, path: &Path) -> SampleOutcome {
    let status = match load_sample(path) {
        Ok(instance) => match schema.validate(&instance) {
            Ok(()) => SampleStatus::Pass,
            Err(violations) => SampleStatus::Fail { violations },
        },
        Err(e) => SampleStatus::Unparsable {
            error: e.to_string(),
        },
    };
    SampleOutcome {
        path: path.to_path_buf(),
        status,
    }
}

/// Check every sample in order, never stopping early.
pub fn run_samples(schema: &CompiledSchema, paths: &[PathBuf]) -> SampleReport {
    let mut report = SampleReport::default();
    for path in paths {
        let outcome = check_sample(schema, path);
        match &outcome.status {
            SampleStatus::Pass => tracing::debug!(path = %path.display(), "sample passed"),
            SampleStatus::Fail { violations } => tracing::debug!(
                path = %path.display(),
                violations = violations.len(),
                "sample failed validation"
            ),
            SampleStatus::Unparsable { error } => {
                tracing::warn!(path = %path.display(), error = %error, "sample could not be parsed")
            }
        }
        report.outcomes.push(outcome);
    }
    tracing::info!(
        total = report.total(),
        passed = report.passed(),
        failed = report.failed(),
        "sample run complete"
    );
    report
}

fn load_sample(path: &Path) -> Result<Value, SpecbuildError> {
    let content = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&content)
        .map_err(|e| ParseError::from_json(path.display().to_string(), &e))?;
    Ok(value)
}
