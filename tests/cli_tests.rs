//! Integration tests for the CLI application
//!
//! These tests verify that the CLI commands work correctly with real data files.

use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

/// Helper to create test sequence files
struct TestDataFiles {
    pub labelled: NamedTempFile,
    pub plain: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        let mut labelled = NamedTempFile::new()?;
        writeln!(labelled, "# heavy chain loops")?;
        writeln!(labelled, "h1 CARDYW")?;
        writeln!(labelled, "h2 CAKDYW")?;
        writeln!(labelled)?;
        writeln!(labelled, "h3 CTRGGYW")?;
        labelled.flush()?;

        let mut plain = NamedTempFile::new()?;
        writeln!(plain, "CARDYF")?;
        writeln!(plain, "CSSYW")?;
        plain.flush()?;

        Ok(TestDataFiles { labelled, plain })
    }
}

/// Get the path to the compiled CLI binary
fn get_cli_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_rssk")
}

fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

#[test]
fn test_cli_matrix_to_stdout() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = Command::new(get_cli_binary_path())
        .args([
            "matrix",
            "--input",
            test_data.labelled.path().to_str().unwrap(),
            "--max-k",
            "3",
        ])
        .output()
        .expect("Failed to run CLI matrix command");

    assert!(
        output.status.success(),
        "Matrix command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let rows = parse_csv(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], vec!["", "h1", "h2", "h3"]);
    assert_eq!(rows[1][0], "h1");
    for (i, row) in rows[1..].iter().enumerate() {
        let diagonal: f64 = row[i + 1].parse().unwrap();
        assert_eq!(diagonal, 1.0);
    }
}

#[test]
fn test_cli_matrix_against_file() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("kernel.csv");

    let output = Command::new(get_cli_binary_path())
        .args([
            "matrix",
            "--input",
            test_data.labelled.path().to_str().unwrap(),
            "--against",
            test_data.plain.path().to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
            "--workers",
            "2",
        ])
        .output()
        .expect("Failed to run CLI matrix command");

    assert!(
        output.status.success(),
        "Matrix command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output_path.exists(), "Kernel matrix file was not created");

    let text = std::fs::read_to_string(&output_path).unwrap();
    let rows = parse_csv(&text);
    assert_eq!(rows[0], vec!["", "CARDYF", "CSSYW"]);
    assert_eq!(rows.len(), 4);
    assert!(rows[1..].iter().all(|row| row.len() == 3));
}

#[test]
fn test_cli_pair_command() {
    let output = Command::new(get_cli_binary_path())
        .args(["pair", "caba", "gaba", "--min-k", "2", "--max-k", "2", "--no-normalize"])
        .output()
        .expect("Failed to run CLI pair command");

    assert!(output.status.success());
    let value: f64 = String::from_utf8_lossy(&output.stdout).trim().parse().unwrap();
    assert_eq!(value, 9.0 / 64.0);
}

#[test]
fn test_cli_pair_explicit_engine() {
    let output = Command::new(get_cli_binary_path())
        .args(["pair", "caba", "gaba", "--min-k", "2", "--max-k", "2", "--engine", "explicit"])
        .output()
        .expect("Failed to run CLI pair command");

    assert!(output.status.success());
    let value: f64 = String::from_utf8_lossy(&output.stdout).trim().parse().unwrap();
    assert!((value - 36.0 / 65.0).abs() < 1e-12);
}

#[test]
fn test_cli_soft_matching_rejects_lowercase() {
    let output = Command::new(get_cli_binary_path())
        .args(["pair", "card", "CAKD", "--soft-matching"])
        .output()
        .expect("Failed to run CLI pair command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_config_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.json");

    let output = Command::new(get_cli_binary_path())
        .args([
            "pair",
            "caba",
            "gaba",
            "--min-k",
            "2",
            "--max-k",
            "2",
            "--no-normalize",
            "--save-config",
            config_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run CLI pair command");
    assert!(output.status.success());
    assert!(config_path.exists(), "Configuration file was not created");

    let output = Command::new(get_cli_binary_path())
        .args(["pair", "caba", "gaba", "--config", config_path.to_str().unwrap()])
        .output()
        .expect("Failed to run CLI pair command");
    assert!(output.status.success());
    let value: f64 = String::from_utf8_lossy(&output.stdout).trim().parse().unwrap();
    assert_eq!(value, 9.0 / 64.0);
}

#[test]
fn test_cli_invalid_lengths() {
    let output = Command::new(get_cli_binary_path())
        .args(["pair", "caba", "gaba", "--min-k", "3", "--max-k", "2"])
        .output()
        .expect("Failed to run CLI pair command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_missing_input_file() {
    let output = Command::new(get_cli_binary_path())
        .args(["matrix", "--input", "/nonexistent/sequences.txt"])
        .output()
        .expect("Failed to run CLI matrix command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_help() {
    let output = Command::new(get_cli_binary_path())
        .arg("--help")
        .output()
        .expect("Failed to run CLI help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("matrix"));
    assert!(stdout.contains("pair"));
}
