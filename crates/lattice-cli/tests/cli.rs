//! End-to-end tests for the `lattice` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn lattice() -> Command {
    Command::cargo_bin("lattice").unwrap()
}

const TEXTBOOK: [&str; 14] = [
    "--spot", "100", "--strike", "100", "--rate", "5", "--maturity", "1", "--steps", "2",
    "--up", "1.2", "--down", "0.8",
];

#[test]
fn price_minimal_prints_root_value() {
    lattice()
        .args(["--format", "minimal", "price"])
        .args(TEXTBOOK)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("13.280017"));
}

#[test]
fn price_json_reports_parameters() {
    let output = lattice()
        .args(["--format", "json", "price"])
        .args(TEXTBOOK)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let p = report["probability_up"].as_f64().unwrap();
    assert!((p - 0.563_287_8).abs() < 1e-6);
    assert_eq!(report["option"], "call");
    assert_eq!(report["exercise"], "European");
}

#[test]
fn price_table_for_american_put_shows_premium() {
    lattice()
        .args(["price", "--option", "put", "--exercise", "american", "--steps", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Early Exercise Premium"))
        .stdout(predicate::str::contains("Black-Scholes").not());
}

#[test]
fn price_json_black_scholes_only_for_european() {
    let european = lattice()
        .args(["--format", "json", "price", "--option", "put", "--steps", "200"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&european.stdout).unwrap();
    let reference = report["black_scholes"].as_f64().unwrap();
    assert!((reference - 5.573_526).abs() < 1e-5);
    assert!((report["value"].as_f64().unwrap() - reference).abs() < 2e-2);

    let american = lattice()
        .args(["--format", "json", "price", "--option", "put", "--exercise", "american"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&american.stdout).unwrap();
    assert!(report["black_scholes"].is_null());
}

#[test]
fn price_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hull.toml");
    let template = lattice().args(["template", "--as", "toml"]).output().unwrap();
    fs::write(&path, template.stdout).unwrap();

    lattice()
        .args(["--format", "minimal", "price", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("5.0896"));
}

#[test]
fn levels_csv_lists_every_node() {
    let output = lattice()
        .args(["--format", "csv", "levels", "--hedge"])
        .args(TEXTBOOK)
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    // Header plus 1 + 2 + 3 nodes.
    assert_eq!(text.lines().count(), 7);
    assert!(text.contains("144.0000"));
    assert!(text.contains("64.0000"));
}

#[test]
fn levels_json_max_depth() {
    let output = lattice()
        .args(["--format", "json", "levels", "--max-depth", "1"])
        .args(TEXTBOOK)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["levels"].as_array().unwrap().len(), 2);
    assert!(report.get("hedge_ratios").is_none());
}

#[test]
fn unsupported_option_kind_is_rejected() {
    lattice()
        .args(["price", "--option", "straddle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported option kind"));
}

#[test]
fn arbitrage_violation_is_reported() {
    lattice()
        .args(["price", "--rate", "30", "--steps", "1", "--up", "1.1", "--down", "0.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Arbitrage violation"));
}

#[test]
fn volatility_conflicts_with_factors() {
    lattice()
        .args(["price", "--volatility", "20", "--up", "1.1", "--down", "0.9"])
        .assert()
        .failure();
}
