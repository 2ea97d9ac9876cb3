//! # specbuild-core: Foundational Types for the Specification Build
//!
//! Shared primitives for the pipeline that turns a markdown specification
//! into a composed JSON Schema, an augmented markdown copy, and an HTML export.
//!
//! ## Key Design Principles
//!
//! 1. **One error hierarchy.** `SpecbuildError` distinguishes missing inputs,
//!    parse failures, schema compilation failures, and revision lookup
//!    failures. Export failures have their own type because they are logged,
//!    never propagated.
//!
//! 2. **`SchemaBytes` newtype.** Everything written to the composed schema
//!    file flows through `SchemaBytes::new()`, which fixes key order and
//!    formatting. Repeated builds are byte-identical by construction.
//!
//! 3. **Defaults mirror the repository layout.** `BuildConfig::default()` is
//!    the layout of the specification repository; a YAML file only needs to
//!    name what differs.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `specbuild-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod digest;
pub mod document;
pub mod error;

// Re-export primary types for ergonomic imports.
pub use canonical::SchemaBytes;
pub use config::{BuildConfig, RendererConfig, CONFIG_FILE_NAME};
pub use digest::{sha256_digest, ContentDigest};
pub use document::{read_required, SpecDocument};
pub use error::{ExportFailure, InputKind, ParseError, SchemaError, SpecbuildError};
