//! Integration tests for the tailor CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut command = Command::cargo_bin("tailor").unwrap();
    command.arg("--no-color");
    command
}

/// Helper function to create a directory holding a config file
fn create_test_project(filename: &str, content: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(filename), content).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tailor rewrites utility classes"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("tailor {VERSION}")))
        .stdout(predicate::str::contains("Passes: 8"));
}

#[test]
fn test_canonicalize_arguments() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["canonicalize", "[display:flex]", "w-[64rem]", "hover:italic"])
        .assert()
        .success()
        .stdout("flex w-256 hover:italic\n")
        .stderr(predicate::str::contains("[display:flex] → flex"));
}

#[test]
fn test_canonicalize_stdin_with_collapse() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["canonicalize", "--stdin", "--collapse"])
        .write_stdin("mt-1 mr-1\nmb-1 ml-1\n")
        .assert()
        .success()
        .stdout("m-1\n");
}

#[test]
fn test_canonicalize_json_format() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli()
        .current_dir(temp_dir.path())
        .args(["canonicalize", "--format", "json", "bg-gradient-to-t", "flex"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["output"], serde_json::json!(["bg-linear-to-t", "flex"]));
    assert_eq!(report["rewrites"][0]["from"], "bg-gradient-to-t");
    assert_eq!(report["rewrites"][0]["to"], "bg-linear-to-t");
    assert_eq!(report["rewrites"].as_array().unwrap().len(), 1);
}

#[test]
fn test_canonicalize_rem_px() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["canonicalize", "--rem-px", "16", "w-[16px]"])
        .assert()
        .success()
        .stdout("w-4\n");
}

#[test]
fn test_canonicalize_without_candidates_fails() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .arg("canonicalize")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No candidates given"));
}

#[test]
fn test_explicit_config_file() {
    let temp_dir = create_test_project("custom.json", r#"{ "prefix": "tw" }"#);
    let config_path = temp_dir.path().join("custom.json");
    cli()
        .arg("--config")
        .arg(&config_path)
        .args(["canonicalize", "tw:[display:flex]"])
        .assert()
        .success()
        .stdout("tw:flex\n");
}

#[test]
fn test_discovered_toml_config() {
    let temp_dir = create_test_project(
        "tailor.toml",
        "[canonicalize]\ncollapse = true\n",
    );
    cli()
        .current_dir(temp_dir.path())
        .args(["canonicalize", "mt-1", "mr-1", "mb-1", "ml-1"])
        .assert()
        .success()
        .stdout("m-1\n");
}

#[test]
fn test_config_theme_tokens() {
    let temp_dir = create_test_project(
        ".tailorrc.json",
        r##"{ "theme": { "--color-brand": "#123456" } }"##,
    );
    cli()
        .current_dir(temp_dir.path())
        .args(["canonicalize", "[color:var(--color-brand)]"])
        .assert()
        .success()
        .stdout("text-brand\n");
}

#[test]
fn test_missing_config_file_fails() {
    cli()
        .args(["--config", "does-not-exist.json", "canonicalize", "flex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_signature_command() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["signature", "[display:flex]"])
        .assert()
        .success()
        .stdout(".x {\n  display: flex;\n}\n");
}

#[test]
fn test_signature_of_variant() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["signature", "--variant", "hover"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".x:hover {"));
}

#[test]
fn test_signature_of_unknown_candidate_fails() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["signature", "not-a-utility"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not compile"));
}

#[test]
fn test_passes_command() {
    cli()
        .arg("passes")
        .assert()
        .success()
        .stdout(predicate::str::contains("canonical-variants"))
        .stdout(predicate::str::contains("arbitrary-to-named"))
        .stdout(predicate::str::contains("optimize-modifiers"));
}

#[test]
fn test_passes_json() {
    let output = cli().args(["passes", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let passes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(passes.as_array().unwrap().len(), 8);
    assert_eq!(passes[0]["id"], "canonical-variants");
}
