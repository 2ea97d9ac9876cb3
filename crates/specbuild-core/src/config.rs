//! # Build Configuration
//!
//! Paths and renderer settings for the pipeline, loaded from an optional
//! YAML file. Every field defaults to the fixed layout of the specification
//! repository, so a project following that layout needs no file at all.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SpecbuildError;

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "specbuild.yaml";

/// Pipeline configuration. Relative paths are resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Markdown specification to read.
    pub spec: PathBuf,
    /// Handlebars template that splices fragments into one schema.
    pub template: PathBuf,
    /// Output directory.
    pub build_dir: PathBuf,
    /// File name of the composed schema inside `build_dir`.
    pub schema_file: String,
    /// File name of the augmented markdown inside `build_dir`.
    pub spec_output: String,
    /// Directory whose files are copied to `build_dir/figures`.
    pub figures_dir: PathBuf,
    /// Directory of sample documents checked by the tester.
    pub samples_dir: PathBuf,
    /// External HTML renderer.
    pub renderer: RendererConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            spec: PathBuf::from("src/main/md/otio-core.md"),
            template: PathBuf::from("src/main/templates/otio.schema.hbs"),
            build_dir: PathBuf::from("build"),
            schema_file: "otio.schema.json".to_string(),
            spec_output: "index.md".to_string(),
            figures_dir: PathBuf::from("figures"),
            samples_dir: PathBuf::from("src/test/json"),
            renderer: RendererConfig::default(),
        }
    }
}

/// External program that turns the augmented markdown into HTML.
///
/// `{input}` and `{output}` in `args` are replaced with the markdown path
/// and the HTML path.
///
/// Runnable code chunks in the markdown are executed only if the renderer
/// does it. The default `pandoc` invocation renders them as plain code. To
/// execute them, name a renderer that runs code and pass its flag:
///
/// ```yaml
/// renderer:
///   program: quarto
///   args: [render, "{input}", --execute, --to, html, --output, index.html]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Program name or path.
    pub program: String,
    /// Argument template.
    pub args: Vec<String>,
    /// File name of the HTML output inside `build_dir`.
    pub output: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
            args: [
                "--standalone",
                "--from",
                "gfm",
                "--to",
                "html5",
                "--output",
                "{output}",
                "{input}",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            output: "index.html".to_string(),
        }
    }
}

impl BuildConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `SpecbuildError::Config` if the file cannot be read or is not
    /// a valid configuration document.
    pub fn from_file(path: &Path) -> Result<Self, SpecbuildError> {
        let content = std::fs::read_to_string(path).map_err(|e| SpecbuildError::Config {
            path: path.to_path_buf(),
            reason: format!("cannot read file: {e}"),
        })?;
        Self::from_yaml_str(&content).map_err(|reason| SpecbuildError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))
    }

    /// Resolve configuration for a project root.
    ///
    /// An explicit path must exist. Without one, `specbuild.yaml` in the root
    /// is used when present, otherwise the defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, SpecbuildError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading configuration");
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Path of the composed schema file.
    pub fn schema_path(&self) -> PathBuf {
        self.build_dir.join(&self.schema_file)
    }

    /// Path of the augmented markdown copy.
    pub fn spec_output_path(&self) -> PathBuf {
        self.build_dir.join(&self.spec_output)
    }

    /// Path of the HTML export.
    pub fn html_output_path(&self) -> PathBuf {
        self.build_dir.join(&self.renderer.output)
    }

    /// Return a copy with every relative path joined onto `root`.
    pub fn rooted(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        Self {
            spec: join(&self.spec),
            template: join(&self.template),
            build_dir: join(&self.build_dir),
            figures_dir: join(&self.figures_dir),
            samples_dir: join(&self.samples_dir),
            ..self.clone()
        }
    }
}
