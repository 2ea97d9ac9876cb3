//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout the build pipeline. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Missing inputs fail immediately, naming the input kind and the path.
//! - Parse errors carry the source name and the 1-based line and column
//!   reported by the parser.
//! - Export failures are reported but never returned from a build.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error type for the build pipeline.
#[derive(Error, Debug)]
pub enum SpecbuildError {
    /// A required input file or directory is absent or empty.
    #[error("missing {kind}: {}", path.display())]
    MissingInput {
        /// Which input was missing.
        kind: InputKind,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Malformed JSON or template source.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The composed schema does not compile.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The source-control revision could not be resolved.
    #[error("revision unavailable: {reason}")]
    RevisionUnavailable {
        /// Why the lookup failed.
        reason: String,
    },

    /// The configuration file is unreadable or invalid.
    #[error("config error in '{}': {reason}", path.display())]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Reason the configuration was rejected.
        reason: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecbuildError {
    /// Construct a [`SpecbuildError::MissingInput`].
    pub fn missing(kind: InputKind, path: impl AsRef<Path>) -> Self {
        Self::MissingInput {
            kind,
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// The inputs the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// The markdown specification.
    Specification,
    /// The schema template.
    Template,
    /// The composed schema consumed by the tester.
    ComposedSchema,
    /// The directory of sample documents.
    SampleDirectory,
}

impl InputKind {
    /// Returns a human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Specification => "specification",
            Self::Template => "schema template",
            Self::ComposedSchema => "composed schema",
            Self::SampleDirectory => "sample directory",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed JSON in a composed schema or sample, or a template failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source_name}:{line}:{column}: {message}")]
pub struct ParseError {
    /// File name or logical name of the text that failed to parse.
    pub source_name: String,
    /// 1-based line, or 0 when unknown.
    pub line: usize,
    /// 1-based column, or 0 when unknown.
    pub column: usize,
    /// Parser message.
    pub message: String,
}

impl ParseError {
    /// Build a parse error from a `serde_json` failure.
    pub fn from_json(source_name: impl Into<String>, err: &serde_json::Error) -> Self {
        Self {
            source_name: source_name.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }

    /// Build a parse error without position information.
    pub fn without_position(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            line: 0,
            column: 0,
            message: message.into(),
        }
    }
}

/// The composed schema is not a structurally valid JSON Schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("composed schema does not compile: {reason}")]
pub struct SchemaError {
    /// Message from the schema compiler.
    pub reason: String,
}

/// HTML export failure. Logged by the build, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("export failed: {reason}")]
pub struct ExportFailure {
    /// Why the renderer did not produce output.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_names_kind_and_path() {
        let err = SpecbuildError::missing(InputKind::Template, "src/main/templates/x.hbs");
        let msg = err.to_string();
        assert!(msg.contains("schema template"), "{msg}");
        assert!(msg.contains("x.hbs"), "{msg}");
    }

    #[test]
    fn parse_error_from_json_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": ,\n}").unwrap_err();
        let parse = ParseError::from_json("temp.json", &err);
        assert_eq!(parse.line, 2);
        assert!(parse.column > 0);
        assert!(parse.to_string().starts_with("temp.json:2:"));
    }

    #[test]
    fn parse_error_converts_into_top_level() {
        let err: SpecbuildError = ParseError::without_position("otio.schema.hbs", "bad").into();
        assert!(matches!(err, SpecbuildError::Parse(_)));
    }
}
