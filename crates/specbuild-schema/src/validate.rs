//! # Schema Compilation and Validation
//!
//! Compiles the composed schema into a reusable validator with the
//! `jsonschema` crate and validates documents against it.
//!
//! The draft is detected from the schema's `$schema` keyword. Compilation
//! checks the schema against its meta-schema, so a composed schema that is
//! valid JSON but not a valid JSON Schema is rejected before any sample is
//! evaluated.
//!
//! ## Schema Resolution
//!
//! Internal `$ref`s of the form `#/definitions/<name>` are resolved by the
//! jsonschema crate natively. Every other URI goes through
//! [`OfflineRetriever`], which refuses it: the composed schema is meant to be
//! self-contained, and compilation must never make network requests.

use std::fmt;
use std::path::Path;

use jsonschema::{Retrieve, Uri, Validator};
use serde::Serialize;
use serde_json::Value;

use specbuild_core::{read_required, InputKind, ParseError, SchemaError, SpecbuildError};

/// Retriever that rejects every external reference.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external reference '{}' is not available offline", uri.as_str()).into())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Schema keyword that failed (last segment of `schema_path`).
    pub keyword: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "  {path} [{}]: {}", self.keyword, self.message)
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled composed schema.
///
/// `Send + Sync`; compile once and reuse for every sample.
pub struct CompiledSchema {
    validator: Validator,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema").finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile a schema value.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the value is not a valid JSON Schema or
    /// references a schema that is not embedded in it.
    pub fn compile(schema: &Value) -> Result<Self, SchemaError> {
        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever);
        let validator = opts.build(schema).map_err(|e| SchemaError {
            reason: e.to_string(),
        })?;
        Ok(Self { validator })
    }

    /// Read, parse, and compile a composed schema file.
    ///
    /// # Errors
    ///
    /// Returns `SpecbuildError::MissingInput` if the file is absent or empty,
    /// `SpecbuildError::Parse` if it is not JSON, and
    /// `SpecbuildError::Schema` if it does not compile.
    pub fn load(path: &Path) -> Result<Self, SpecbuildError> {
        let content = read_required(path, InputKind::ComposedSchema)?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ParseError::from_json(path.display().to_string(), &e))?;
        Ok(Self::compile(&value)?)
    }

    /// Returns true if the instance satisfies the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validate an instance, collecting every violation.
    pub fn validate(&self, instance: &Value) -> Result<(), ValidationViolations> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| {
                let schema_path = e.schema_path.to_string();
                Violation {
                    instance_path: e.instance_path.to_string(),
                    keyword: keyword_of(&schema_path).to_string(),
                    schema_path,
                    message: e.to_string(),
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationViolations { violations })
        }
    }
}

/// Final non-empty segment of a JSON pointer.
fn keyword_of(schema_path: &str) -> &str {
    schema_path
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("")
}
