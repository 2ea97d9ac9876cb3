//! Integration test: build and test the `demos/otio-core` project.
//!
//! The demo is copied into a temporary directory so the build output never
//! lands in the repository.

use std::path::{Path, PathBuf};

use specbuild_cli::builder::{build, BuildArgs};
use specbuild_cli::export::ExportOutcome;
use specbuild_cli::tester::{check, format_report, TestArgs};
use specbuild_core::BuildConfig;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn copy_tree(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).unwrap();
    for entry in std::fs::read_dir(from).unwrap().flatten() {
        let path = entry.path();
        let target = to.join(entry.file_name());
        if path.is_dir() {
            copy_tree(&path, &target);
        } else {
            std::fs::copy(&path, &target).unwrap();
        }
    }
}

fn demo_copy() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    copy_tree(&repo_root().join("demos/otio-core"), dir.path());
    dir
}

fn offline_args() -> BuildArgs {
    BuildArgs {
        revision: Some("4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string()),
        skip_export: true,
        ..BuildArgs::default()
    }
}

#[test]
fn demo_builds_and_all_samples_pass() {
    let dir = demo_copy();
    let config = BuildConfig::discover(dir.path(), None).unwrap();
    assert_eq!(config.renderer.program, "pandoc");

    let report = build(&offline_args(), &config, dir.path()).unwrap();
    assert_eq!(report.fragment_count, 3, "python block must not be extracted");
    assert_eq!(report.export, ExportOutcome::Skipped);

    let schema: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report.schema_path).unwrap()).unwrap();
    let definitions = schema["definitions"].as_object().unwrap();
    let mut names: Vec<&str> = definitions.keys().map(String::as_str).collect();
    names.sort();
    assert_eq!(names, vec!["Clip", "RationalTime", "TimeRange"]);

    let samples = check(&TestArgs::default(), &config, dir.path()).unwrap();
    assert_eq!(samples.total(), 2);
    assert_eq!(samples.passed(), 2, "{}", format_report(&samples));
}

#[test]
fn demo_reports_a_sample_missing_a_required_property() {
    let dir = demo_copy();
    let config = BuildConfig::discover(dir.path(), None).unwrap();
    build(&offline_args(), &config, dir.path()).unwrap();

    let bad = dir.path().join("src/test/json/unnamed-clip.json");
    std::fs::write(&bad, r#"{"OTIO_SCHEMA": "Clip.1"}"#).unwrap();

    let samples = check(&TestArgs::default(), &config, dir.path()).unwrap();
    assert_eq!(samples.total(), 3);
    assert_eq!(samples.passed(), 2);
    assert!(!samples.outcome(&bad).unwrap().passed());
}

#[test]
fn demo_rebuild_is_byte_identical() {
    let dir = demo_copy();
    let config = BuildConfig::discover(dir.path(), None).unwrap();
    let first = build(&offline_args(), &config, dir.path()).unwrap();
    let bytes = std::fs::read(&first.schema_path).unwrap();
    let second = build(&offline_args(), &config, dir.path()).unwrap();
    assert_eq!(first.digest, second.digest);
    assert_eq!(bytes, std::fs::read(&second.schema_path).unwrap());
}
