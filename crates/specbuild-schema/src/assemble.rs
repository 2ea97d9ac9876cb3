//! # Schema Assembly
//!
//! Splices extracted fragments into one JSON Schema document through a
//! Handlebars template.
//!
//! The template context is the array of fragment texts, so a template
//! iterates them with `{{#each this}}` and may separate entries with
//! `{{#unless @last}},{{/unless}}`. HTML escaping is disabled: fragments are
//! JSON and are spliced raw.
//!
//! The rendered text is parsed before anything is written; a template that
//! produces malformed JSON fails here with a `ParseError` carrying the line
//! and column within the rendered document.

use std::path::Path;

use handlebars::Handlebars;
use serde_json::Value;

use specbuild_core::{read_required, InputKind, ParseError, SchemaBytes, SpecbuildError};

use crate::extract::Fragment;

const TEMPLATE_NAME: &str = "schema";

/// A compiled schema template.
pub struct SchemaAssembler {
    registry: Handlebars<'static>,
    source_name: String,
}

impl std::fmt::Debug for SchemaAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaAssembler")
            .field("source_name", &self.source_name)
            .finish_non_exhaustive()
    }
}

/// Result of rendering fragments through the template.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSchema {
    /// Template output before parsing.
    pub rendered: String,
    /// Parsed schema document.
    pub value: Value,
    /// Number of fragments that went into the template.
    pub fragment_count: usize,
}

impl ComposedSchema {
    /// Deterministic bytes for the schema file.
    pub fn to_bytes(&self) -> Result<SchemaBytes, SpecbuildError> {
        SchemaBytes::new(&self.value).map_err(|e| {
            SpecbuildError::Parse(ParseError::without_position(
                "composed schema",
                e.to_string(),
            ))
        })
    }
}

impl SchemaAssembler {
    /// Load and compile a template file.
    ///
    /// # Errors
    ///
    /// Returns `SpecbuildError::MissingInput` if the file is absent or empty
    /// and `SpecbuildError::Parse` if the template does not compile.
    pub fn load(path: &Path) -> Result<Self, SpecbuildError> {
        let source = read_required(path, InputKind::Template)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("template")
            .to_string();
        Self::from_template_str(name, &source)
    }

    /// Compile a template from text.
    pub fn from_template_str(
        source_name: impl Into<String>,
        source: &str,
    ) -> Result<Self, SpecbuildError> {
        let source_name = source_name.into();
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| ParseError::without_position(source_name.clone(), e.to_string()))?;
        Ok(Self {
            registry,
            source_name,
        })
    }

    /// Name of the template source, used in error messages.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Render fragments and parse the result.
    ///
    /// # Errors
    ///
    /// Returns `SpecbuildError::Parse` if rendering fails or the output is
    /// not valid JSON.
    pub fn assemble(&self, fragments: &[Fragment]) -> Result<ComposedSchema, SpecbuildError> {
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        let rendered = self
            .registry
            .render(TEMPLATE_NAME, &texts)
            .map_err(|e| ParseError::without_position(self.source_name.clone(), e.to_string()))?;

        let value: Value = serde_json::from_str(&rendered).map_err(|e| {
            tracing::debug!(rendered = %rendered, "rendered schema is not valid JSON");
            ParseError::from_json(format!("{} (rendered)", self.source_name), &e)
        })?;

        tracing::info!(fragments = fragments.len(), "assembled composed schema");

        Ok(ComposedSchema {
            rendered,
            value,
            fragment_count: fragments.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_fragments;
    use serde_json::json;

    const DEFINITIONS_TEMPLATE: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "definitions": {
    {{#each this}}{{this}}{{#unless @last}},{{/unless}}
    {{/each}}
  }
}"##;

    fn fragment(text: &str) -> Fragment {
        Fragment {
            index: 0,
            line: 1,
            text: text.to_string(),
        }
    }

    #[test]
    fn zero_fragments_yield_minimal_schema() {
        let assembler = SchemaAssembler::from_template_str("t.hbs", DEFINITIONS_TEMPLATE).unwrap();
        let composed = assembler.assemble(&[]).unwrap();
        assert_eq!(
            composed.value,
            json!({"$schema": "http://json-schema.org/draft-07/schema#", "definitions": {}})
        );
        assert_eq!(composed.fragment_count, 0);
        let again = assembler.assemble(&[]).unwrap();
        assert_eq!(composed.to_bytes().unwrap(), again.to_bytes().unwrap());
    }

    #[test]
    fn fragments_become_definitions() {
        let md = "```json\n\"Clip\": {\"type\": \"object\"}\n```\n\n```json\n\"Gap\": {\"type\": \"object\", \"required\": [\"duration\"]}\n```\n";
        let assembler = SchemaAssembler::from_template_str("t.hbs", DEFINITIONS_TEMPLATE).unwrap();
        let composed = assembler.assemble(&extract_fragments(md)).unwrap();
        assert_eq!(composed.value["definitions"]["Clip"]["type"], "object");
        assert_eq!(composed.value["definitions"]["Gap"]["required"][0], "duration");
        assert_eq!(composed.fragment_count, 2);
    }

    #[test]
    fn fragments_are_not_html_escaped() {
        let assembler = SchemaAssembler::from_template_str("t.hbs", DEFINITIONS_TEMPLATE).unwrap();
        let composed = assembler
            .assemble(&[fragment("\"Url\": {\"pattern\": \"^a&b<c>$\"}")])
            .unwrap();
        assert_eq!(composed.value["definitions"]["Url"]["pattern"], "^a&b<c>$");
    }

    #[test]
    fn malformed_fragment_is_parse_error_with_position() {
        let assembler = SchemaAssembler::from_template_str("t.hbs", DEFINITIONS_TEMPLATE).unwrap();
        let err = assembler.assemble(&[fragment("\"Clip\": {\"type\": }")]).unwrap_err();
        match err {
            SpecbuildError::Parse(p) => {
                assert_eq!(p.source_name, "t.hbs (rendered)");
                assert!(p.line > 0);
            }
            other => panic!("expected Parse, got {other}"),
        }
    }

    #[test]
    fn malformed_template_is_parse_error() {
        let err = SchemaAssembler::from_template_str("t.hbs", "{ {{#each this}}{{/if}} }").unwrap_err();
        assert!(matches!(err, SpecbuildError::Parse(_)), "{err}");
    }

    #[test]
    fn load_missing_template_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaAssembler::load(&dir.path().join("otio.schema.hbs")).unwrap_err();
        assert!(matches!(
            err,
            SpecbuildError::MissingInput {
                kind: InputKind::Template,
                ..
            }
        ));
    }

    #[test]
    fn load_uses_file_name_as_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("otio.schema.hbs");
        std::fs::write(&path, DEFINITIONS_TEMPLATE).unwrap();
        let assembler = SchemaAssembler::load(&path).unwrap();
        assert_eq!(assembler.source_name(), "otio.schema.hbs");
    }
}
