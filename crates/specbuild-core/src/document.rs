//! # Specification Document
//!
//! The markdown source read once per build, and the augmented copy that the
//! HTML export renders.

use std::path::{Path, PathBuf};

use crate::error::{InputKind, SpecbuildError};

/// A markdown specification loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDocument {
    path: PathBuf,
    text: String,
}

impl SpecDocument {
    /// Read a specification from disk.
    ///
    /// # Errors
    ///
    /// Returns `SpecbuildError::MissingInput` if the file does not exist or
    /// is empty.
    pub fn load(path: &Path) -> Result<Self, SpecbuildError> {
        let text = read_required(path, InputKind::Specification)?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Wrap in-memory text.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw markdown text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The markdown with the schema link and version sections appended.
    pub fn augmented(&self, schema_file: &str, revision: &str) -> String {
        format!(
            "{}\n## JSON Schema File\n\n[Collected JSON Schema definitions]({schema_file})\n\n## Version\n\n{revision} \n",
            self.text
        )
    }
}

/// Read a text input that must exist and be non-empty.
///
/// # Errors
///
/// Returns `SpecbuildError::MissingInput` for an absent or empty file and
/// `SpecbuildError::Io` for any other read failure.
pub fn read_required(path: &Path, kind: InputKind) -> Result<String, SpecbuildError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SpecbuildError::missing(kind, path));
        }
        Err(e) => return Err(e.into()),
    };
    if text.is_empty() {
        return Err(SpecbuildError::missing(kind, path));
    }
    Ok(text)
}
