//! End-to-end tests driving the `kkb` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BILL_JSON: &str = r#"{
  "items": [
    { "id": 1, "name": "Adobo", "price": 100, "person": "Ana" },
    { "id": 2, "name": "Sinigang", "price": 200, "person": "Ben" }
  ],
  "sharedItems": [
    { "id": 3, "name": "Lumpia", "price": 60, "sharedBy": ["Ana", "Ben"] }
  ],
  "serviceCharge": { "value": "10", "kind": "percent" },
  "currencySymbol": "₱"
}"#;

/// A scratch dir holding a config file and a bill file.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("kkb.toml"),
        "[display]\ncurrency_symbol = \"€\"\n\n[share]\nbase_url = \"https://split.example.com/\"\n",
    )
    .expect("Failed to write config");
    std::fs::write(dir.path().join("bill.json"), BILL_JSON).expect("Failed to write bill");
    dir
}

fn kkb(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kkb"));
    cmd.arg("--config")
        .arg(dir.join("kkb.toml"))
        .env_remove("KKB_CURRENCY")
        .env_remove("KKB_SHARE_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn kkb");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for kkb")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_split_from_file() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["split", "--file"])
        .arg(dir.path().join("bill.json"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Ana"));
    assert!(stdout.contains("Lumpia (split)"));
    assert!(stdout.contains("Service Charge (proportional):"));
    // 360 subtotal + 10%
    assert!(stdout.contains("Grand Total:"));
    assert!(stdout.contains("₱396.00"));
}

#[test]
fn test_split_json_from_stdin() {
    let dir = workspace();
    let mut cmd = kkb(dir.path());
    cmd.args(["split", "--json"]);
    let output = run_with_stdin(cmd, BILL_JSON);

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("stdout is JSON");
    assert_eq!(value["personTotals"][0]["person"], "Ana");
    assert_eq!(value["personTotals"][1]["person"], "Ben");
    let ana_total = value["personTotals"][0]["total"].as_f64().unwrap();
    assert!((ana_total - 143.0).abs() < 1e-9);
}

#[test]
fn test_encode_then_decode() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["encode", "--file"])
        .arg(dir.path().join("bill.json"))
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let mut lines = stdout.lines();
    let token = lines.next().expect("token line").to_string();
    let link = lines.next().expect("link line").to_string();
    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert!(link.starts_with("https://split.example.com/?data="));

    let original: serde_json::Value = serde_json::from_str(BILL_JSON).unwrap();
    for input in [&token, &link] {
        let output = kkb(dir.path())
            .arg("decode")
            .arg(input)
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());

        let decoded: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
        assert_eq!(decoded["currencySymbol"], original["currencySymbol"]);
        assert_eq!(decoded["sharedItems"][0]["sharedBy"], original["sharedItems"][0]["sharedBy"]);
        assert_eq!(decoded["items"][1]["name"], "Sinigang");
    }
}

#[test]
fn test_split_from_token() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["encode", "--file"])
        .arg(dir.path().join("bill.json"))
        .output()
        .expect("Failed to execute command");
    let token = stdout_of(&output).lines().next().unwrap().to_string();

    let output = kkb(dir.path())
        .args(["split", "--token"])
        .arg(&token)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("₱396.00"));
}

#[test]
fn test_decode_bad_token_exits_with_error() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["decode", "not-a-bill!"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Unreadable bill token"));
}

#[test]
fn test_template_uses_config_currency() {
    let dir = workspace();
    let output = kkb(dir.path())
        .arg("template")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["currencySymbol"], "€");
    assert_eq!(value["items"], serde_json::json!([]));
}

#[test]
fn test_template_with_service_charge() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["template", "--currency", "₱", "--service-charge", "12", "--kind", "percent"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["currencySymbol"], "₱");
    assert_eq!(value["serviceCharge"]["value"], "12");
    assert_eq!(value["serviceCharge"]["kind"], "percent");
}

#[test]
fn test_template_rejects_unknown_kind() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["template", "--kind", "tip"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--kind"));
}

#[test]
fn test_template_warns_on_unlisted_currency() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["template", "--currency", "XBT"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["currencySymbol"], "XBT");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not offered by the bill form"));
}

#[test]
fn test_currencies_lists_symbols() {
    let dir = workspace();
    let output = kkb(dir.path())
        .arg("currencies")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.lines().any(|line| line == "₱"));
    assert!(stdout.lines().any(|line| line == "CHF"));
}

#[test]
fn test_env_overrides_config() {
    let dir = workspace();
    let output = kkb(dir.path())
        .env("KKB_CURRENCY", "£")
        .arg("template")
        .output()
        .expect("Failed to execute command");

    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["currencySymbol"], "£");
}

#[test]
fn test_missing_config_file_exits_with_config_error() {
    let dir = workspace();
    let output = Command::new(env!("CARGO_BIN_EXE_kkb"))
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("template")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"));
}

#[test]
fn test_conflicting_sources_rejected() {
    let dir = workspace();
    let output = kkb(dir.path())
        .args(["split", "--token", "abc", "--url", "https://kkb.app/?data=abc"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"));
}
