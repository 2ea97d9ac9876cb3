//! # specbuild-schema: Fragment Extraction, Assembly & Validation
//!
//! The schema half of the specification build.
//!
//! ## Fragment Extraction (`extract`)
//!
//! [`extract_fragments`] scans markdown line by line and returns the
//! interiors of fenced blocks tagged `json`, in document order.
//!
//! ## Assembly (`assemble`)
//!
//! [`SchemaAssembler`] renders the fragments through a Handlebars template
//! and parses the result into a [`ComposedSchema`].
//!
//! ## Validation (`validate`, `samples`)
//!
//! [`CompiledSchema`] wraps a `jsonschema` validator. [`run_samples`] checks a
//! set of sample documents against it and collects a [`SampleReport`].
//!
//! ## Crate Policy
//!
//! - Depends only on `specbuild-core` internally.
//! - No filesystem writes; the CLI owns every output file.
//! - Schema compilation never makes network requests.

pub mod assemble;
pub mod extract;
pub mod samples;
pub mod validate;

pub use assemble::{ComposedSchema, SchemaAssembler};
pub use extract::{extract_fragments, Fragment};
pub use samples::{check_sample, discover_samples, run_samples, SampleOutcome, SampleReport, SampleStatus};
pub use validate::{CompiledSchema, ValidationViolations, Violation};
