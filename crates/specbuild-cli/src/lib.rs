//! # specbuild-cli: Specification Build Command-Line Interface
//!
//! Provides the `specbuild` command-line interface for the specification
//! repository.
//!
//! ## Subcommands
//!
//! - `specbuild build`: Compose the JSON Schema from the markdown
//!   specification, write the augmented markdown, copy figures, export HTML.
//! - `specbuild test`: Check every sample document against the composed
//!   schema.
//!
//! ```bash
//! specbuild build
//! specbuild test
//! specbuild build --revision "$(git rev-parse HEAD)" --skip-export
//! ```
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from pipeline logic.
//! - Extraction, assembly, and validation live in `specbuild-schema`; this
//!   crate owns every filesystem write and every external process.

pub mod builder;
pub mod export;
pub mod logging;
pub mod revision;
pub mod tester;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to the project root.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `root`, uses that. Otherwise returns the path
/// relative to the current directory.
pub fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let root_relative = root.join(path);
    if root_relative.exists() {
        root_relative
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve_path(Path::new("/abs/spec.md"), Path::new("/proj")),
            PathBuf::from("/abs/spec.md")
        );
    }

    #[test]
    fn existing_root_relative_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("spec.md"), "# x").unwrap();
        assert_eq!(
            resolve_path(Path::new("spec.md"), dir.path()),
            dir.path().join("spec.md")
        );
    }

    #[test]
    fn missing_root_relative_path_falls_back_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_path(Path::new("nope.md"), dir.path()),
            PathBuf::from("nope.md")
        );
    }
}
