use std::fs;
use std::path::PathBuf;

use career_platform::{
    config::LaunchConfig,
    error::AppError,
    startup::{StartupGuard, StartupIssue},
};

fn config(required: &[&str]) -> LaunchConfig {
    LaunchConfig {
        manifest: PathBuf::from("launch.json"),
        required_files: required.iter().map(PathBuf::from).collect(),
    }
}

#[test]
fn test_complete_layout_yields_launch_plan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("launch.json"),
        r#"{"name": "career-platform", "scripts": {"start": "bin/server --port 5001"}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();

    let guard = StartupGuard::with_root(config(&["launch.json", "Cargo.toml"]), dir.path());
    assert!(guard.check().is_empty());

    let plan = guard.preflight().unwrap();
    assert_eq!(plan.program, "bin/server");
    assert_eq!(plan.args, vec!["--port", "5001"]);
}

#[test]
fn test_missing_manifest_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let guard = StartupGuard::with_root(config(&["launch.json", "Cargo.toml"]), dir.path());

    assert_eq!(
        guard.check(),
        vec![
            StartupIssue::MissingFile(PathBuf::from("launch.json")),
            StartupIssue::MissingFile(PathBuf::from("Cargo.toml")),
        ]
    );

    match guard.preflight() {
        Err(AppError::StartupError(message)) => {
            assert!(message.contains("launch.json"));
            assert!(message.contains("Cargo.toml"));
        }
        other => panic!("expected startup error, got {:?}", other),
    }
}

#[test]
fn test_manifest_without_start_script() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("launch.json"), r#"{"scripts": {"test": "x"}}"#).unwrap();

    let guard = StartupGuard::with_root(config(&["launch.json"]), dir.path());
    assert_eq!(
        guard.check(),
        vec![StartupIssue::MissingStartCommand(PathBuf::from("launch.json"))]
    );
}

#[test]
fn test_unparseable_manifest() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("launch.json"), "{ not json").unwrap();

    let guard = StartupGuard::with_root(config(&[]), dir.path());
    let issues = guard.check();
    assert_eq!(issues.len(), 1);
    assert!(matches!(issues[0], StartupIssue::InvalidManifest { .. }));
}
