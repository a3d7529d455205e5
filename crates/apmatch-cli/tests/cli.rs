use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn apmatch(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("apmatch").unwrap();
    cmd.arg("--config").arg(config_dir.path().join("config.json"));
    cmd
}

fn write_default_config(dir: &TempDir) {
    Command::cargo_bin("apmatch")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["config", "init"])
        .assert()
        .success();
}

fn fixture_args(cmd: &mut Command) -> &mut Command {
    cmd.arg("--fixtures")
        .arg(data_dir().join("fixtures/invoices.json"))
        .arg("--purchase-orders")
        .arg(data_dir().join("purchase_orders.json"))
}

#[test]
fn process_baseline_fixture_is_approved() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);

    let mut cmd = apmatch(&dir);
    cmd.args(["process", "Invoice_1_Baseline.pdf"]);
    fixture_args(&mut cmd)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"po_number\": \"PO-2024-001\""))
        .stdout(predicate::str::contains("\"po_match_confidence\": 1.0"))
        .stdout(predicate::str::contains("\"recommended_action\": \"approve\""));
}

#[test]
fn process_price_trap_reports_mismatch() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);

    let mut cmd = apmatch(&dir);
    cmd.args(["process", "Invoice_4_Price_Trap.pdf", "--format", "text"]);
    fixture_args(&mut cmd)
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched PO: PO-2024-004"))
        .stdout(predicate::str::contains("price_mismatch"))
        .stdout(predicate::str::contains("(20"))
        .stdout(predicate::str::contains("hold_for_review"));
}

#[test]
fn process_text_document() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);

    apmatch(&dir)
        .arg("process")
        .arg(data_dir().join("invoices/Invoice_1_Baseline.txt"))
        .arg("--purchase-orders")
        .arg(data_dir().join("purchase_orders.json"))
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-2024-0117"))
        .stdout(predicate::str::contains("PO-2024-001"))
        .stdout(predicate::str::contains("approve"));
}

#[test]
fn process_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);

    apmatch(&dir)
        .args(["process", "/nonexistent/invoice.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_malformed_purchase_orders() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);
    let po_path = dir.path().join("purchase_orders.json");
    fs::write(&po_path, "\"not a list\"").unwrap();

    apmatch(&dir)
        .args(["process", "Invoice_1_Baseline.pdf", "--fixtures"])
        .arg(data_dir().join("fixtures/invoices.json"))
        .arg("--purchase-orders")
        .arg(&po_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("list or a map"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);

    let docs = dir.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    for name in [
        "Invoice_1_Baseline.pdf",
        "Invoice_2_Scanned.pdf",
        "Invoice_3_Different_Format.pdf",
        "Invoice_4_Price_Trap.pdf",
        "Invoice_5_Missing_PO.pdf",
    ] {
        fs::write(docs.join(name), b"").unwrap();
    }
    let out = dir.path().join("out");

    let mut cmd = apmatch(&dir);
    cmd.arg("batch")
        .arg(format!("{}/*.pdf", docs.display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary");
    fixture_args(&mut cmd)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 successful"));

    assert!(out.join("Invoice_3_Different_Format.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 6);
    assert!(summary.contains("Invoice_2_Scanned.pdf,success,UNKNOWN"));
    assert!(summary.contains("manual_entry"));
    assert!(summary.contains("PO-2024-003"));
    assert!(summary.contains("no_matching_po"));
    assert!(summary.contains("request_purchase_order"));
}

#[test]
fn batch_fail_fast_stops_on_storage_error() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);

    let docs = dir.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("Invoice_1_Baseline.pdf"), b"").unwrap();
    let po_path = dir.path().join("purchase_orders.json");
    fs::write(&po_path, "42").unwrap();

    let run = |fail_fast: bool| {
        let mut cmd = apmatch(&dir);
        cmd.arg("batch")
            .arg(format!("{}/*.pdf", docs.display()))
            .arg("--fixtures")
            .arg(data_dir().join("fixtures/invoices.json"))
            .arg("--purchase-orders")
            .arg(&po_path);
        if fail_fast {
            cmd.arg("--fail-fast");
        }
        cmd.assert()
    };

    run(false)
        .success()
        .stdout(predicate::str::contains("1 failed"));
    run(true)
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();

    apmatch(&dir)
        .args(["config", "set", "discrepancy.variance_threshold", "10"])
        .assert()
        .success();

    apmatch(&dir)
        .args(["config", "get", "discrepancy.variance_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10"));

    apmatch(&dir)
        .args(["config", "get", "matching.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    write_default_config(&dir);

    apmatch(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    apmatch(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn config_set_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/apmatch/config.json");

    Command::cargo_bin("apmatch")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("showing defaults"));

    Command::cargo_bin("apmatch")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "matching.overlap_ratio", "0.75"])
        .assert()
        .success();

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("0.75"));

    Command::cargo_bin("apmatch")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "matching.typo", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
