//! End-to-end tests for the `valor` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HEADER: &str = "Company Name,Client Name,WACC,TGR,Opening Cash,Other Non-Op Assets,Debt,DLOM,Money Infusion,First_Period_Fraction,NOIAT_1,Depreciation_1,CapEx_1,Inc_NWC_1,NOIAT_2,Depreciation_2,CapEx_2,Inc_NWC_2";
const ACME: &str = "Acme Widgets,Board,12,3,50,0,200,10,0,1,100,10,20,5,120,10,15,5";
const FLAT: &str = "Flat Growth,,4,4,50,0,200,10,0,1,100,10,20,5,120,10,15,5";
const SPARSE: &str = "Sparse Co,,12,3,50,0,200,10,,,100,10,20,5,120,10,15,5";
const HUGE: &str = "Huge Co,,12,3,50,0,200,10,0,1,50000000000000000000000000000,50000000000000000000000000000,20,5,120,10,15,5";

fn valor() -> Command {
    let mut cmd = Command::cargo_bin("valor").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG").env_remove("VALOR_CONFIG");
    cmd
}

fn write_input(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("entities.csv");
    let mut contents = String::from(HEADER);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    contents.push('\n');
    fs::write(&path, contents).unwrap();
    path
}

// =============================================================================
// TEMPLATE
// =============================================================================

#[test]
fn test_template_header() {
    valor()
        .args(["template", "--years", "2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Company Name,Client Name,WACC,TGR,Opening Cash",
        ))
        .stdout(predicate::str::contains("Inc_NWC_2"))
        .stdout(predicate::str::contains("NOIAT_3").not());
}

#[test]
fn test_template_rejects_zero_years() {
    valor()
        .args(["template", "--years", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid number of projection years"));
}

// =============================================================================
// VALUE
// =============================================================================

#[test]
fn test_value_table() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[ACME]);

    valor()
        .args(["value", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing: Acme Widgets"))
        .stdout(predicate::str::contains("DCF Workings"))
        .stdout(predicate::str::contains("0.892857"))
        .stdout(predicate::str::contains("1,167.16"))
        .stdout(predicate::str::contains("915.45"))
        .stdout(predicate::str::contains("Terminal Share of EV"))
        .stdout(predicate::str::contains("85.98%"))
        .stdout(predicate::str::contains("EV Sensitivity"));
}

#[test]
fn test_value_quiet_without_sensitivity() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[ACME]);

    valor()
        .args(["value", "--no-sensitivity", "--quiet", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Valuation Summary"))
        .stdout(predicate::str::contains("DCF Workings").not())
        .stdout(predicate::str::contains("EV Sensitivity").not());
}

#[test]
fn test_value_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[ACME]);

    let output = valor()
        .args(["value", "--format", "json", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let acme = &reports[0];
    assert_eq!(acme["company_name"], "Acme Widgets");
    assert_eq!(acme["client_name"], "Board");
    assert_eq!(acme["status"], "valued");
    assert_eq!(acme["summary"][2]["label"], "Enterprise Value (EV)");
    let figure = |i: usize| acme["summary"][i]["value"].as_f64().unwrap();
    assert!((figure(2) - 1167.16).abs() < 1e-9);
    assert!((figure(7) - 915.45).abs() < 1e-9);
    assert_eq!(acme["sensitivity"]["rows"].as_array().map(Vec::len), Some(9));
}

#[test]
fn test_value_continues_past_failed_entities() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[FLAT, SPARSE, ACME]);

    valor()
        .args(["value", "--no-sensitivity", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("1,167.16"))
        .stderr(predicate::str::contains(
            "Cannot value Flat Growth. WACC (4.00%) equals TGR (4.00%)",
        ))
        .stderr(predicate::str::contains(
            "Cannot value Sparse Co. Missing inputs: Money Infusion, First_Period_Fraction",
        ))
        .stderr(predicate::str::contains("2 of 3 entities could not be valued"));
}

#[test]
fn test_value_overflowing_entity_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[HUGE, ACME]);

    valor()
        .args(["value", "--no-sensitivity", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("1,167.16"))
        .stderr(predicate::str::contains(
            "Cannot value Huge Co. Mathematical error: free cash flow overflow",
        ))
        .stderr(predicate::str::contains("1 of 2 entities could not be valued"));
}

#[test]
fn test_value_with_defaults() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[SPARSE]);
    let defaults = dir.path().join("defaults.json");
    fs::write(&defaults, r#"{"Money Infusion": 0, "First_Period_Fraction": 1}"#).unwrap();

    valor()
        .args(["value", "--no-sensitivity", "--input"])
        .arg(&input)
        .arg("--defaults")
        .arg(&defaults)
        .assert()
        .success()
        .stdout(predicate::str::contains("1,167.16"))
        .stderr(predicate::str::contains("filled from defaults"));
}

#[test]
fn test_value_missing_file() {
    valor()
        .args(["value", "--input", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_value_with_config() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[ACME]);
    let config = dir.path().join("narrow.toml");
    fs::write(
        &config,
        r#"
name = "NARROW"

[sensitivity.discount_rate]
step = 0.01
span = 0.01
floor = 0.01

[sensitivity.growth_rate]
step = 0.01
span = 0
floor = -0.02
"#,
    )
    .unwrap();

    let output = valor()
        .args(["value", "--format", "json", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let grid = &reports[0]["sensitivity"];
    assert_eq!(grid["discount_rates"].as_array().map(Vec::len), Some(3));
    assert_eq!(grid["rows"].as_array().map(Vec::len), Some(1));
}

// =============================================================================
// SENSITIVITY
// =============================================================================

#[test]
fn test_sensitivity_csv_long_form() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[ACME]);

    let output = valor()
        .args(["sensitivity", "--format", "csv", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next(),
        Some("company,growth_rate,discount_rate,enterprise_value")
    );
    assert_eq!(lines.count(), 9 * 7);
    assert!(stdout.contains("Acme Widgets,0.03,0.12,1167.16"));
}

#[test]
fn test_rate_precision_from_config() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[ACME]);
    let config = dir.path().join("fine.toml");
    fs::write(&config, "[precision]\nrate_dp = 5\n").unwrap();

    valor()
        .args(["value", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("12.000%"))
        .stdout(predicate::str::contains("85.984%"))
        .stdout(predicate::str::contains("12.00%").not());
}

#[test]
fn test_sensitivity_table() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &[ACME]);

    valor()
        .args(["sensitivity", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("TGR \\ WACC"))
        .stdout(predicate::str::contains("12.00%"))
        .stdout(predicate::str::contains("Base EV 1,167.16"));
}
